//! Grammar tests for test/bind expressions

mod expressions;
