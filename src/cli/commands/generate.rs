//! Generate Command
//!
//! Runs the full pipeline for one theme and prints the resulting artifact.
//!
//! Usage:
//!   slidesmith generate "Climate Change" --slides 8 --audience students --format pdf

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::deck::PresentationService;
use crate::types::{OutputFormat, PresentationRequest, PresentationRequestInput, Result};

pub struct GenerateOptions {
    pub theme: String,
    pub slides: Option<u32>,
    pub audience: Option<String>,
    pub info: Option<String>,
    pub style: Option<String>,
    pub format: Option<OutputFormat>,
}

impl GenerateOptions {
    fn into_request(self) -> Result<PresentationRequest> {
        let request = PresentationRequest::from_input(PresentationRequestInput {
            theme: Some(self.theme),
            slide_count: self.slides,
            audience: self.audience,
            additional_info: self.info,
            style: self.style,
            format: None,
        })?;

        Ok(match self.format {
            Some(format) => request.with_format(format),
            None => request,
        })
    }
}

pub async fn run(options: GenerateOptions) -> Result<()> {
    let output = Output::new();
    let request = options.into_request()?;
    let config = ConfigLoader::load()?;
    let service = PresentationService::from_config(&config)?;

    output.info(&format!(
        "Generating {} slides on \"{}\" for {}",
        request.slide_count(),
        request.theme(),
        request.audience()
    ));

    let artifact = service.create(&request).await?;
    output.artifact(&artifact);
    Ok(())
}
