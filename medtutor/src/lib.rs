//! # medtutor
//!
//! Gemini-backed helpers for a medical education front end.
//!
//! medtutor wraps the Gemini `generateContent` API behind a small layered
//! runtime and exposes three clinical operations on top of it: structured
//! case generation, a tutor chat session, and clinical image analysis.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! medtutor = { version = "0.1", features = ["clinical"] }
//! ```
//!
//! ```ignore
//! use medtutor::clinical::{ImageInput, MedicalTutor};
//! use medtutor::config::TutorConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tutor = MedicalTutor::from_config(&TutorConfig::from_env()?)?;
//!
//! // Structured case
//! let case = tutor.generate_case().await?;
//! if let Some(case) = case.value() {
//!     println!("{}: {}", case.title, case.chief_complaint);
//! }
//!
//! // Tutor chat
//! let mut chat = tutor.create_chat();
//! let reply = chat.send_message("Why start with an ECG?").await?;
//!
//! // Image analysis
//! let image = ImageInput::from_jpeg_bytes(&std::fs::read("cxr.jpg")?);
//! println!("{}", tutor.analyze_image_text(&image, None).await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: `gemini`, `layers` and `clinical`
//! - `gemini`: Gemini provider support
//! - `layers`: Built-in layers (logging)
//! - `clinical`: Case, chat and imaging helpers plus [`config`]
//! - `schema`: Derive JSON Schema for the case record via schemars
//! - `full`: All features enabled

// Re-export core types and traits
pub use medtutor_core::*;

// Re-export providers under `provider` module
#[cfg(feature = "medtutor-provider")]
pub mod provider {
    //! AI provider implementations.
    pub use medtutor_provider::*;
}

// Re-export layers under `layer` module
#[cfg(feature = "medtutor-layer")]
pub mod layer {
    //! Built-in middleware layers.
    pub use medtutor_layer::*;
}

// Re-export schemars when schema feature is enabled
#[cfg(feature = "schema")]
pub mod schemars {
    pub use ::schemars::*;
}

#[cfg(feature = "gemini")]
pub mod config;

#[cfg(feature = "clinical")]
pub mod clinical;

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude module containing the most commonly used types and traits.
    //!
    //! ```
    //! use medtutor::prelude::*;
    //! ```

    pub use crate::{
        AiError, ChatConfig, ChatSession, Content, EmptyReason, FinishReason, Generated, Layer,
        Part, Provider, Result, Role, RuntimeExecutor, TextParams, Usage,
    };

    #[cfg(feature = "medtutor-provider")]
    pub use crate::provider::*;

    #[cfg(feature = "medtutor-layer")]
    pub use crate::layer::*;

    #[cfg(feature = "gemini")]
    pub use crate::config::TutorConfig;

    #[cfg(feature = "clinical")]
    pub use crate::clinical::{CaseRecord, ImageInput, MedicalTutor};
}
