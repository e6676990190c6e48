mod publisher;

pub use publisher::{
    ImagePayload, MetadataDocument, MetadataPublisher, Publication, PublishError, PublishedItem,
    parse_codes,
};
