pub mod conversation;
pub mod dialog;
pub mod recognizer;
