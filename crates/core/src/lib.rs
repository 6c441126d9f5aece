//! Perception-to-alert pipeline for a camera-guided mobility aid.
//!
//! Per-frame object detections are filtered, ranged, arbitrated and rendered
//! into rate-limited speech, tone and vibration feedback.

pub mod shared {
    pub mod assist_config;
    pub mod bounding_box;
    pub mod constants;
    pub mod frame;
    pub mod stream_metadata;
}

pub mod perception {
    pub mod domain {
        pub mod calibration_model;
        pub mod class_table;
        pub mod detection;
        pub mod object_detector;
        pub mod perception_filter;
        pub mod scored_object;
    }
    pub mod infrastructure;
}

pub mod alerting {
    pub mod domain {
        pub mod alarm_state;
        pub mod alert_arbitrator;
    }
}

pub mod feedback {
    pub mod domain {
        pub mod feedback_controller;
        pub mod feedback_error;
        pub mod haptic_motor;
        pub mod modulation;
        pub mod speech_channel;
        pub mod speech_synthesizer;
        pub mod tone_channel;
        pub mod tone_generator;
        pub mod vibration_channel;
    }
    pub mod infrastructure;
}

pub mod camera {
    pub mod domain {
        pub mod camera;
    }
    pub mod infrastructure;
}

pub mod voice {
    pub mod domain {
        pub mod speech_recognizer;
        pub mod transcript;
        pub mod voice_command;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod detection_loop;
    pub mod pipeline_logger;
    pub mod session_state;
    pub mod voice_command_supervisor;
}

#[cfg(test)]
mod test_doubles;
