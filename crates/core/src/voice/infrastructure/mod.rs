pub mod line_recognizer;
