pub mod prospect_digest;
