//! Declarative description of the page a rendering host draws.

pub mod html;
pub mod presenter;

use serde::Serialize;

pub use presenter::{present, present_error};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// True when any block is a control that feeds a generation action.
    pub fn has_generation_controls(&self) -> bool {
        self.blocks.iter().any(|block| {
            matches!(
                block,
                Block::FileUpload { .. }
                    | Block::TextInput { .. }
                    | Block::Slider { .. }
                    | Block::Button { .. }
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Span {
    Plain { text: String },
    Link { text: String, href: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Title {
        text: String,
    },
    Text {
        spans: Vec<Span>,
    },
    PasswordInput {
        name: String,
        label: String,
        value: String,
    },
    FileUpload {
        name: String,
        label: String,
        accept: Vec<String>,
    },
    TextInput {
        name: String,
        label: String,
        value: String,
    },
    Slider {
        name: String,
        label: String,
        min: f32,
        max: f32,
        step: f32,
        value: f32,
    },
    Button {
        name: String,
        value: String,
        label: String,
        busy_label: Option<String>,
    },
    Warning {
        message: String,
    },
    Error {
        message: String,
    },
    Columns {
        columns: Vec<Column>,
    },
    Image {
        src: String,
        caption: String,
        width: u32,
        height: u32,
        fit_column: bool,
    },
    Subheader {
        text: String,
    },
    StyledText {
        text: String,
        font_family: String,
        font_size_px: u32,
        line_height: f32,
    },
}

impl Block {
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text {
            spans: vec![Span::Plain { text: text.into() }],
        }
    }
}
