pub mod image_sequence_camera;
