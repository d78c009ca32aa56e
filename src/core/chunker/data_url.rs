use super::DATA_URL_SCHEME;

/// A borrowed view of a `data:` URL split at its first comma.
///
/// `header` is everything before the comma (e.g. `data:audio/mp3;base64`) and
/// `body` is the encoded payload after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub header: &'a str,
    pub body: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Parses a payload of the form `data:<mime>[;base64],<body>`.
    ///
    /// Returns `None` when the scheme marker or the comma separator is missing.
    pub fn parse(payload: &'a str) -> Option<Self> {
        if !payload.starts_with(DATA_URL_SCHEME) {
            return None;
        }

        let (header, body) = payload.split_once(',')?;
        Some(Self { header, body })
    }

    /// Rebuilds a payload that carries this header and the given body.
    pub fn with_body(&self, body: &str) -> String {
        let mut out = String::with_capacity(self.header.len() + 1 + body.len());
        out.push_str(self.header);
        out.push(',');
        out.push_str(body);
        out
    }
}

/// How a payload is read by the splitter.
///
/// Every chunker operation goes through [`EncodedPayload::parse`], so the
/// duration estimate, the split decision and the chunks always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EncodedPayload<'a> {
    /// `data:` header with a non-empty body.
    DataUrl(DataUrl<'a>),
    /// Headerless text made only of base64 characters.
    Raw(&'a str),
    /// No locatable body; handled as a single opaque chunk.
    Opaque,
}

impl<'a> EncodedPayload<'a> {
    pub(crate) fn parse(payload: &'a str) -> Self {
        if let Some(url) = DataUrl::parse(payload) {
            return if url.body.is_empty() {
                Self::Opaque
            } else {
                Self::DataUrl(url)
            };
        }

        if !payload.is_empty() && is_base64_text(payload) {
            Self::Raw(payload)
        } else {
            Self::Opaque
        }
    }

    /// The encoded body, if there is one.
    pub(crate) fn body(&self) -> Option<&'a str> {
        match self {
            Self::DataUrl(url) => Some(url.body),
            Self::Raw(body) => Some(body),
            Self::Opaque => None,
        }
    }

    /// Builds a chunk payload in the same shape as the input.
    pub(crate) fn with_body(&self, body: &str) -> String {
        match self {
            Self::DataUrl(url) => url.with_body(body),
            Self::Raw(_) | Self::Opaque => body.to_string(),
        }
    }
}

fn is_base64_text(text: &str) -> bool {
    text.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}
