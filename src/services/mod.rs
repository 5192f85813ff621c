pub mod gemini; // Gemini vision inference client

pub use gemini::{GeminiClient, VisionModel};
