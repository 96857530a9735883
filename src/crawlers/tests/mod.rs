
mod collaborator_tests;
