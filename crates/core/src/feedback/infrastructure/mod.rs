pub mod command_speech_synthesizer;
pub mod log_speech_synthesizer;
pub mod log_tone_generator;
pub mod unavailable_haptic_motor;
