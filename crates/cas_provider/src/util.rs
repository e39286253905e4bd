use iso8601_timestamp::{Duration, Timestamp};

static ALPHABET: [char; 32] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j',
    'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'v', 'w', 'x', 'y', 'z',
];

/// Length of the random part of a ticket (5 bits per character)
pub const TICKET_TOKEN_LENGTH: usize = 32;

/// Generate a random string from the operating system's secure source
pub fn secure_random_str(length: usize) -> String {
    nanoid!(length, &ALPHABET)
}

/// Generate a ticket identifier such as `ST-<token>`
pub fn generate_ticket_id(prefix: &str) -> String {
    format!("{}-{}", prefix, secure_random_str(TICKET_TOKEN_LENGTH))
}

/// Whether something created at `created_at` has outlived `minutes` at `now`
pub fn has_expired(created_at: &Timestamp, minutes: i64, now: &Timestamp) -> bool {
    let lifetime_ms = minutes.saturating_mul(60_000);
    now.to_unix_timestamp_ms() > created_at.to_unix_timestamp_ms().saturating_add(lifetime_ms)
}

/// Oldest creation time still valid for a lifetime of `minutes` at `now`
pub fn expiry_cutoff(minutes: i64, now: &Timestamp) -> Timestamp {
    let cutoff_ms = now
        .to_unix_timestamp_ms()
        .saturating_sub(minutes.saturating_mul(60_000));

    Timestamp::UNIX_EPOCH + Duration::milliseconds(cutoff_ms)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::ops::Add;
    use std::time::Duration;

    use iso8601_timestamp::Timestamp;

    use super::*;

    #[test]
    fn ticket_ids_carry_prefix() {
        let id = generate_ticket_id("PGT");
        assert!(id.starts_with("PGT-"));
        assert_eq!(id.len(), "PGT-".len() + TICKET_TOKEN_LENGTH);
    }

    #[test]
    fn ticket_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_ticket_id("ST")).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn expires_after_lifetime() {
        let created_at = Timestamp::now_utc();

        assert!(!has_expired(&created_at, 5, &created_at));
        assert!(!has_expired(
            &created_at,
            5,
            &created_at.add(Duration::from_secs(4 * 60))
        ));
        assert!(has_expired(
            &created_at,
            5,
            &created_at.add(Duration::from_secs(6 * 60))
        ));
    }

    #[test]
    fn cutoff_is_lifetime_before_now() {
        let now = Timestamp::now_utc();
        let cutoff = expiry_cutoff(5, &now);

        assert_eq!(
            now.to_unix_timestamp_ms() - cutoff.to_unix_timestamp_ms(),
            5 * 60_000
        );
    }
}
