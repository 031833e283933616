/// Values per detection record in a detector's flat output.
pub const RECORD_LEN: usize = 7;

/// Detections must score strictly above this to be kept.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Flat detector output: `[batch, class, confidence, left, top, right, bottom]` per record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionFeed {
    values: Vec<f32>,
}

impl DetectionFeed {
    pub fn new(values: Vec<f32>) -> Self {
        if values.len() % RECORD_LEN != 0 {
            log::warn!(
                "detection feed has {} trailing values; ignoring partial record",
                values.len() % RECORD_LEN
            );
        }
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Complete records, in detector order.
    pub fn records(&self) -> impl Iterator<Item = RawDetection> + '_ {
        self.values
            .chunks_exact(RECORD_LEN)
            .map(|chunk| RawDetection {
                header: [chunk[0], chunk[1]],
                confidence: chunk[2],
                bbox: NormalizedRect {
                    left: chunk[3],
                    top: chunk[4],
                    right: chunk[5],
                    bottom: chunk[6],
                },
            })
    }

    pub fn len(&self) -> usize {
        self.values.len() / RECORD_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Box coordinates as fractions of the source frame's width and height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawDetection {
    /// Batch and class indices; carried through untouched.
    pub header: [f32; 2],
    pub confidence: f32,
    pub bbox: NormalizedRect,
}

/// A detection that passed the confidence filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Position of the record in the detector's output.
    pub record_index: usize,
    /// Position among accepted detections; drives parameter cycling.
    pub acceptance_index: usize,
    pub confidence: f32,
    pub bbox: NormalizedRect,
}

/// Keep records scoring strictly above `threshold`, numbering them in order.
///
/// Rejected records do not consume an acceptance index.
pub fn accept_detections(feed: &DetectionFeed, threshold: f32) -> Vec<Detection> {
    feed.records()
        .enumerate()
        .filter(|(_, record)| record.confidence > threshold)
        .enumerate()
        .map(|(acceptance_index, (record_index, record))| Detection {
            record_index,
            acceptance_index,
            confidence: record.confidence,
            bbox: record.bbox,
        })
        .collect()
}
