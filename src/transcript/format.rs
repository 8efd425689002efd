use std::fmt::Write as FmtWrite;

use log::debug;

use super::result::{SegmentResult, TranscriptionResult};

/// Alternatives at or below this confidence render as an empty line.
pub const MIN_CONFIDENCE: f32 = 0.5;

const TICKS_PER_MILLISECOND: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Vtt,
    Txt,
}

/// Text of one output file plus the extension it should be saved with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTranscript {
    pub text: String,
    pub extension: &'static str,
}

impl OutputFormat {
    /// Case-insensitive lookup; anything unrecognized or missing is JSON.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::to_ascii_lowercase).as_deref() {
            Some("vtt") => OutputFormat::Vtt,
            Some("txt") => OutputFormat::Txt,
            _ => OutputFormat::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => ".json",
            OutputFormat::Vtt => ".vtt",
            OutputFormat::Txt => ".txt",
        }
    }

    pub fn render(self, result: &TranscriptionResult) -> serde_json::Result<RenderedTranscript> {
        let text = match self {
            OutputFormat::Json => serde_json::to_string_pretty(result)?,
            OutputFormat::Vtt => render_vtt(result),
            OutputFormat::Txt => render_txt(result),
        };
        debug!("Rendered {:?} transcript: {} bytes", self, text.len());

        Ok(RenderedTranscript {
            text,
            extension: self.extension(),
        })
    }
}

fn successful_segments(result: &TranscriptionResult) -> impl Iterator<Item = &SegmentResult> {
    result
        .audio_file_results
        .iter()
        .flat_map(|file| file.segment_results.iter())
        .filter(|segment| segment.is_success())
}

fn cue_text(segment: &SegmentResult) -> &str {
    match segment.best() {
        Some(best) if best.confidence > MIN_CONFIDENCE => best.display.as_str(),
        _ => "",
    }
}

fn render_vtt(result: &TranscriptionResult) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for segment in successful_segments(result) {
        // Writing into a String cannot fail.
        let _ = writeln!(
            output,
            "{} --> {}",
            format_ticks(segment.offset),
            format_ticks(segment.end())
        );
        output.push_str(cue_text(segment));
        output.push_str("\n\n");
    }

    output
}

fn render_txt(result: &TranscriptionResult) -> String {
    let mut output = String::new();

    for segment in successful_segments(result) {
        output.push_str(cue_text(segment));
        output.push('\n');
    }

    output
}

/// Formats a tick count as `hh:mm:ss.fff`, dropping sub-millisecond ticks.
pub fn format_ticks(ticks: u64) -> String {
    let ms = ticks / TICKS_PER_MILLISECOND;
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}
