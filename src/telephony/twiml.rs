//! `TwiML` voice response rendering

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

const SAY_VOICE: &str = "alice";

#[derive(Debug, Error)]
#[error("Failed to render TwiML: {0}")]
pub struct TwimlError(String);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Verb {
    Say { text: String },
    GatherSpeech { action: String },
    Hangup,
}

/// A `<Response>` document built verb by verb
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speak `text` with the standard voice
    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say { text: text.into() });
        self
    }

    /// Listen for speech and submit the transcript to `action`
    pub fn gather_speech(mut self, action: impl Into<String>) -> Self {
        self.verbs.push(Verb::GatherSpeech {
            action: action.into(),
        });
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    pub fn render(&self) -> Result<String, TwimlError> {
        let mut writer = Writer::new(Vec::new());
        let mut write = |event: Event<'_>| {
            writer
                .write_event(event)
                .map_err(|e| TwimlError(e.to_string()))
        };

        write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write(Event::Start(BytesStart::new("Response")))?;
        for verb in &self.verbs {
            match verb {
                Verb::Say { text } => {
                    write(Event::Start(
                        BytesStart::new("Say").with_attributes([("voice", SAY_VOICE)]),
                    ))?;
                    write(Event::Text(BytesText::new(text)))?;
                    write(Event::End(BytesEnd::new("Say")))?;
                }
                Verb::GatherSpeech { action } => {
                    write(Event::Empty(BytesStart::new("Gather").with_attributes([
                        ("input", "speech"),
                        ("action", action.as_str()),
                        ("speechTimeout", "auto"),
                    ])))?;
                }
                Verb::Hangup => write(Event::Empty(BytesStart::new("Hangup")))?,
            }
        }
        write(Event::End(BytesEnd::new("Response")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| TwimlError(e.to_string()))
    }
}
