use super::{Block, Column, Page, Span};
use crate::error::{AppError, ServiceError};
use crate::models::{DecodedImage, GenerationResult, Temperature, ACCEPTED_EXTENSIONS};

pub const PAGE_TITLE: &str = "Poem Generator from Photos";
pub const IMAGE_CAPTION: &str = "Uploaded Image";
pub const POEM_HEADER: &str = "Generated Poem";

pub const FIELD_API_KEY: &str = "api_key";
pub const FIELD_IMAGE: &str = "image";
pub const FIELD_PROMPT: &str = "prompt";
pub const FIELD_TEMPERATURE: &str = "temperature";
pub const FIELD_ACTION: &str = "action";
pub const ACTION_GENERATE: &str = "generate";

/// Maps a successful generation to the two side-by-side regions.
pub fn present(image: &DecodedImage, result: &GenerationResult) -> Block {
    let left = Column {
        blocks: vec![Block::Image {
            src: image.data_uri(),
            caption: IMAGE_CAPTION.to_string(),
            width: image.width,
            height: image.height,
            fit_column: true,
        }],
    };
    let right = Column {
        blocks: vec![
            Block::Subheader {
                text: POEM_HEADER.to_string(),
            },
            Block::StyledText {
                text: result.text.clone(),
                font_family: "serif".to_string(),
                font_size_px: 16,
                line_height: 1.5,
            },
        ],
    };
    Block::Columns {
        columns: vec![left, right],
    }
}

pub fn present_error(error: &ServiceError) -> Block {
    Block::Error {
        message: format!("An error occurred: {}", error),
    }
}

/// Outcome block for any action-level failure.
pub fn present_failure(error: &AppError) -> Block {
    match error {
        AppError::MissingCredential => Block::Error {
            message: error.to_string(),
        },
        AppError::MissingImage => Block::Warning {
            message: error.to_string(),
        },
        AppError::ExternalService(inner) => present_error(inner),
    }
}

/// Title, intro text and the key field. Shown on every page.
pub fn header(api_key: &str) -> Page {
    let mut page = Page::new(PAGE_TITLE);
    page.push(Block::Title {
        text: PAGE_TITLE.to_string(),
    })
    .push(Block::text(
        "This app uses the Google Gemini API to generate poems from images. \
         An API key is required to access this service.",
    ))
    .push(Block::Text {
        spans: vec![
            Span::Plain {
                text: "If you don't have an API key, you can sign up for one at ".to_string(),
            },
            Span::Link {
                text: "Google AI Studio".to_string(),
                href: "https://makersuite.google.com/".to_string(),
            },
            Span::Plain {
                text: ".".to_string(),
            },
        ],
    })
    .push(Block::PasswordInput {
        name: FIELD_API_KEY.to_string(),
        label: "Google API Key".to_string(),
        value: api_key.to_string(),
    });
    page
}

pub fn controls(prompt: &str, temperature: Temperature) -> Vec<Block> {
    vec![
        Block::text("Upload an image and generate a poem inspired by it."),
        Block::FileUpload {
            name: FIELD_IMAGE.to_string(),
            label: "Upload an image".to_string(),
            accept: ACCEPTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        },
        Block::TextInput {
            name: FIELD_PROMPT.to_string(),
            label: "Prompt".to_string(),
            value: prompt.to_string(),
        },
        Block::Slider {
            name: FIELD_TEMPERATURE.to_string(),
            label: "Creativity Level".to_string(),
            min: Temperature::MIN,
            max: Temperature::MAX,
            step: Temperature::STEP,
            value: temperature.value(),
        },
        Block::Button {
            name: FIELD_ACTION.to_string(),
            value: ACTION_GENERATE.to_string(),
            label: "Generate Poem".to_string(),
            busy_label: Some("Generating poem...".to_string()),
        },
    ]
}
