//! Builds the `/subscribe` upgrade path from the current filter state.

use url::form_urlencoded::byte_serialize;

/// Filter state a connection attempt embeds into its upgrade path.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub wanted_collections: Vec<String>,
    pub wanted_dids: Vec<String>,
    pub cursor: Option<i64>,
    pub require_hello: bool,
    pub max_message_size_bytes: Option<u64>,
}

pub fn build_path(state: &FilterState) -> String {
    let mut path = String::from("/subscribe?compress=true");

    for collection in &state.wanted_collections {
        path.push_str("&wantedCollections=");
        path.extend(byte_serialize(collection.as_bytes()));
    }
    for did in &state.wanted_dids {
        path.push_str("&wantedDids=");
        path.extend(byte_serialize(did.as_bytes()));
    }
    if let Some(cursor) = state.cursor {
        path.push_str("&cursor=");
        path.push_str(&cursor.to_string());
    }
    if let Some(max) = state.max_message_size_bytes {
        path.push_str("&maxMessageSizeBytes=");
        path.push_str(&max.to_string());
    }
    if state.require_hello {
        path.push_str("&requireHello=true");
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_minimal_path() {
        let state = FilterState::default();
        assert_eq!(build_path(&state), "/subscribe?compress=true");
    }

    #[test]
    fn builds_path_with_filters_and_cursor() {
        let state = FilterState {
            wanted_collections: vec!["app.bsky.feed.post".to_string()],
            wanted_dids: vec!["did:plc:abc".to_string()],
            cursor: Some(1725519626134432),
            require_hello: true,
            max_message_size_bytes: Some(1_000_000),
        };
        let path = build_path(&state);
        assert!(path.contains("wantedCollections=app.bsky.feed.post"));
        assert!(path.contains("wantedDids=did%3Aplc%3Aabc"));
        assert!(path.contains("cursor=1725519626134432"));
        assert!(path.contains("maxMessageSizeBytes=1000000"));
        assert!(path.contains("requireHello=true"));
    }
}
