mod html_parser_tests;
mod parser_type_tests;
mod text_parser_tests;
