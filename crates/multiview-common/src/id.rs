/// Short random id used to tie the log lines of one command together.
pub fn new_correlation_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_lowercase_hex_chars() {
        let cid = new_correlation_id();
        assert_eq!(cid.len(), 8);
        assert!(cid
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn successive_ids_differ() {
        let ids: std::collections::HashSet<String> =
            (0..16).map(|_| new_correlation_id()).collect();
        assert!(ids.len() > 1);
    }
}
