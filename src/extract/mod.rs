mod extractor;

pub use extractor::{
    extract, ExtractedValue, ExtractionScope, ResultExtractor, EXTRACTION_MARKER,
    FIRST_HIT_POINTER,
};
