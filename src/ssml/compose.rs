//! SSML document composition.

use thiserror::Error;

use crate::resolver::ResolvedParameters;

use super::script::Segment;

const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";

/// Errors that can occur when embedding text in SSML.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("Character {ch:?} at byte {offset} cannot be represented in SSML")]
    ForbiddenCharacter { ch: char, offset: usize },

    /// `segment` counts every script segment, pauses included.
    #[error(
        "Character {ch:?} at byte {offset} of script segment {segment} cannot be represented in SSML"
    )]
    ForbiddenCharacterInSegment {
        ch: char,
        segment: usize,
        offset: usize,
    },
}

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Reject characters XML 1.0 cannot carry, escaped or not.
fn check_text(text: &str) -> Result<(), MarkupError> {
    match text.char_indices().find(|(_, ch)| is_forbidden(*ch)) {
        Some((offset, ch)) => Err(MarkupError::ForbiddenCharacter { ch, offset }),
        None => Ok(()),
    }
}

fn is_forbidden(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

fn escape_checked(text: &str) -> Result<String, MarkupError> {
    check_text(text)?;
    Ok(escape_xml(text))
}

/// Wraps text in `<speak>`/`<prosody>` markup carrying resolved parameters.
#[derive(Debug, Clone)]
pub struct Composer {
    lang: String,
}

impl Composer {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Compose an SSML document for `text`.
    pub fn compose(&self, text: &str, params: &ResolvedParameters) -> Result<String, MarkupError> {
        let body = escape_checked(text)?;
        self.wrap(&body, params)
    }

    /// Compose an SSML document for an annotated script, rendering
    /// pauses as `<break/>` elements.
    pub fn compose_script(
        &self,
        segments: &[Segment],
        params: &ResolvedParameters,
    ) -> Result<String, MarkupError> {
        let mut body = String::new();
        for (index, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Text(text) => {
                    let escaped = escape_checked(text).map_err(|err| match err {
                        MarkupError::ForbiddenCharacter { ch, offset } => {
                            MarkupError::ForbiddenCharacterInSegment {
                                ch,
                                segment: index,
                                offset,
                            }
                        }
                        other => other,
                    })?;
                    body.push_str(&escaped);
                }
                Segment::Pause(duration) => {
                    body.push_str(&format!("<break time=\"{}ms\"/>", duration.as_millis()));
                }
            }
        }
        self.wrap(&body, params)
    }

    fn wrap(&self, body: &str, params: &ResolvedParameters) -> Result<String, MarkupError> {
        let mut out = format!(
            "<speak version=\"1.0\" xmlns=\"{SSML_NAMESPACE}\" xml:lang=\"{}\">",
            escape_checked(&self.lang)?
        );
        if let Some(voice) = &params.voice {
            out.push_str(&format!("<voice name=\"{}\">", escape_checked(voice)?));
        }
        out.push_str(&format!(
            "<prosody rate=\"{}\" pitch=\"{}\" volume=\"{}\">",
            params.rate, params.pitch, params.volume
        ));

        match params.emphasis_level() {
            Some(level) => {
                out.push_str(&format!("<emphasis level=\"{}\">", level.as_str()));
                out.push_str(body);
                out.push_str("</emphasis>");
            }
            None => out.push_str(body),
        }

        out.push_str("</prosody>");
        if params.voice.is_some() {
            out.push_str("</voice>");
        }
        out.push_str("</speak>");
        Ok(out)
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new("en-US")
    }
}

/// Compose with the default `en-US` composer.
pub fn compose(text: &str, params: &ResolvedParameters) -> Result<String, MarkupError> {
    Composer::default().compose(text, params)
}
