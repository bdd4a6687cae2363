//! Clinical tutoring walkthrough.
//!
//! Reads `GEMINI_API_KEY` (and optionally `GEMINI_MODEL`) from the
//! environment or a `.env` file, then:
//! 1. Generates a structured clinical case
//! 2. Discusses it with the tutor, streaming the second answer
//! 3. Analyzes a JPEG passed as the first argument, if any
//!
//! ```text
//! RUST_LOG=medtutor=debug cargo run --example clinical -- chest.jpg
//! ```

use futures::StreamExt;
use medtutor::clinical::{ImageInput, MedicalTutor};
use medtutor::config::TutorConfig;
use medtutor::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = TutorConfig::from_env()?;
    let tutor = MedicalTutor::from_config(&config)?;
    println!("Using model {}", tutor.model());

    println!("\n=== Example 1: Clinical Case ===");
    let case = tutor.generate_case().await?;
    let summary = match case {
        Generated::Value(case) => {
            println!("{} ({})", case.title, case.patient_demographics);
            println!("Chief complaint: {}", case.chief_complaint);
            println!(
                "Vitals: BP {}  HR {}  RR {}  T {}",
                case.vitals.bp, case.vitals.hr, case.vitals.rr, case.vitals.temp
            );
            if let Some(labs) = &case.initial_labs {
                println!("Initial labs: {}", labs);
            }
            format!(
                "{}. {} presenting with {}. History: {}. Exam: {}.",
                case.title,
                case.patient_demographics,
                case.chief_complaint,
                case.history,
                case.physical_exam
            )
        }
        Generated::Empty(reason) => {
            eprintln!("No case generated: {}", reason);
            "A 58-year-old woman with sudden dyspnea two days after a hip replacement.".to_string()
        }
    };

    println!("\n=== Example 2: Tutor Chat ===");
    let mut chat = tutor.create_chat();
    let reply = chat
        .send_message(format!("Here is my case: {} What is the next best step?", summary))
        .await?;
    println!("Tutor: {}", reply.content.unwrap_or_default());

    print!("Tutor (streaming): ");
    {
        let stream = chat
            .send_message_stream("What would change your plan if the patient were hypotensive?")
            .await?;
        futures::pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            print!("{}", chunk?.delta);
        }
    }
    println!("\n({} turns in history)", chat.history().len());

    if let Some(path) = std::env::args().nth(1) {
        println!("\n=== Example 3: Image Analysis ===");
        let image = ImageInput::from_jpeg_bytes(&std::fs::read(&path)?);
        let analysis = tutor.analyze_image_text(&image, None).await?;
        println!("{}", analysis);
    }

    Ok(())
}
