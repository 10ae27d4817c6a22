use std::collections::HashMap;
use std::fmt;
use unicase::UniCase;

/// Bitstream alignment a payload stage guarantees on its output.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCStreamAlignment {
    #[default]
    Unspecified,
    /// Output is split on NAL unit boundaries.
    Nal,
    /// Output is split on access unit boundaries.
    AccessUnit,
}

impl fmt::Display for RTCStreamAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCStreamAlignment::Nal => "nalu",
            RTCStreamAlignment::AccessUnit => "au",
            RTCStreamAlignment::Unspecified => crate::endpoint::configuration::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// A processing step inserted in front of the media session input of an
/// inbound track, selected by the track's encoding.
pub trait PayloadStage: fmt::Debug + Send {
    /// Name the media session knows the stage by.
    fn name(&self) -> &'static str;

    fn alignment(&self) -> RTCStreamAlignment;
}

/// Aligns an H.264 elementary stream on NAL units.
#[derive(Default, Debug, Clone)]
pub struct H264NalParser;

impl PayloadStage for H264NalParser {
    fn name(&self) -> &'static str {
        "h264_parser"
    }

    fn alignment(&self) -> RTCStreamAlignment {
        RTCStreamAlignment::Nal
    }
}

/// Aligns an H.265 elementary stream on NAL units.
#[derive(Default, Debug, Clone)]
pub struct H265NalParser;

impl PayloadStage for H265NalParser {
    fn name(&self) -> &'static str {
        "h265_parser"
    }

    fn alignment(&self) -> RTCStreamAlignment {
        RTCStreamAlignment::Nal
    }
}

/// Builds a fresh stage for one track.
pub type PayloadStageFactory = fn() -> Box<dyn PayloadStage>;

/// Lookup table from encoding name to the stage an inbound track of that
/// encoding needs. Encoding names compare case-insensitively.
#[derive(Clone)]
pub struct PayloadStageRegistry {
    factories: HashMap<UniCase<String>, PayloadStageFactory>,
}

impl Default for PayloadStageRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("H264", || Box::new(H264NalParser));
        registry.register("H265", || Box::new(H265NalParser));
        registry
    }
}

impl fmt::Debug for PayloadStageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut encodings: Vec<&str> = self.factories.keys().map(|k| k.as_str()).collect();
        encodings.sort_unstable();
        f.debug_struct("PayloadStageRegistry")
            .field("encodings", &encodings)
            .finish()
    }
}

impl PayloadStageRegistry {
    /// A registry without any stage, every encoding passes through untouched.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers or replaces the stage for `encoding`.
    pub fn register(&mut self, encoding: &str, factory: PayloadStageFactory) {
        self.factories
            .insert(UniCase::new(encoding.to_owned()), factory);
    }

    /// Builds the stage required by `encoding`, if any.
    pub fn stage_for(&self, encoding: &str) -> Option<Box<dyn PayloadStage>> {
        self.factories
            .get(&UniCase::new(encoding.to_owned()))
            .map(|factory| factory())
    }
}
