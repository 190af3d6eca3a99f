//! Line scanner for arXiv digest bodies.
//!
//! Digest entries are bracketed by delimiter lines containing the
//! two-character token `\\`. The scanner walks the body once and emits an
//! entry only when its accumulated text contains one of the keywords and a
//! link line follows before the next entry opens.

/// One matched abstract and the link line that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Accumulated section text, each line with its trailing newline.
    pub text: String,
    /// The line that carried the `http` link, verbatim.
    pub link: String,
}

const DELIMITER: &str = "\\\\";

enum ScanState {
    /// Outside any section.
    Idle,
    /// Inside a section, accumulating lines. `consume_next_delimiter` is
    /// armed by a "replaced" notice: such entries are short one section
    /// marker, so the next delimiter line is folded into the section
    /// instead of closing it.
    Collecting {
        buf: String,
        consume_next_delimiter: bool,
    },
    /// A keyword matched; the first following line containing `http`
    /// becomes the link. A delimiter without a link abandons the match.
    AwaitingLink { text: String },
}

/// Scans `body` and returns every (abstract, link) pair whose section text
/// contains at least one of `keywords` (case-sensitive substring match).
///
/// Pairs are emitted together or not at all: a matched section with no link
/// line before the next section opens (or before end of input) is dropped.
/// Unterminated sections at end of input are dropped as well.
pub fn extract_listings(body: &str, keywords: &[String]) -> Vec<Listing> {
    let mut listings = Vec::new();
    let mut state = ScanState::Idle;

    for line in body.lines() {
        let is_delimiter = line.contains(DELIMITER);

        state = match state {
            ScanState::Idle => {
                if is_delimiter {
                    ScanState::Collecting {
                        buf: String::new(),
                        consume_next_delimiter: false,
                    }
                } else {
                    ScanState::Idle
                }
            }

            ScanState::Collecting {
                mut buf,
                consume_next_delimiter,
            } => {
                if is_delimiter && !consume_next_delimiter {
                    // Section closed: classify the accumulated text.
                    if keywords.iter().any(|k| buf.contains(k.as_str())) {
                        if line.contains("http") {
                            // arXiv closes entries with "\\ ( https://... )",
                            // so the closing line usually is the link.
                            listings.push(Listing {
                                text: buf,
                                link: line.to_string(),
                            });
                            ScanState::Idle
                        } else {
                            ScanState::AwaitingLink { text: buf }
                        }
                    } else {
                        ScanState::Idle
                    }
                } else {
                    buf.push_str(line);
                    buf.push('\n');
                    let armed = line.contains("replaced");
                    ScanState::Collecting {
                        buf,
                        consume_next_delimiter: if is_delimiter {
                            armed
                        } else {
                            consume_next_delimiter || armed
                        },
                    }
                }
            }

            ScanState::AwaitingLink { text } => {
                if line.contains("http") {
                    listings.push(Listing {
                        text,
                        link: line.to_string(),
                    });
                    ScanState::Idle
                } else if is_delimiter {
                    // Next section opens with the match still unlinked:
                    // drop it.
                    ScanState::Collecting {
                        buf: String::new(),
                        consume_next_delimiter: false,
                    }
                } else {
                    ScanState::AwaitingLink { text }
                }
            }
        };
    }

    listings
}
