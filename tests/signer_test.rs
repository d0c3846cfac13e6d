use corezoid::{ApiConfig, Credentials, Error, RequestSigner};
use std::collections::HashSet;

fn signer(secret: &str) -> RequestSigner {
    RequestSigner::new(
        Credentials::new("L", secret).unwrap(),
        ApiConfig::default().with_host("https://example.com"),
    )
    .unwrap()
}

const BODIES: &[&str] = &[
    "",
    "{}",
    r#"{"ops":[]}"#,
    r#"{"ops":[{"ref":"a","type":"create","obj":"task","conv_id":"1","data":{}}]}"#,
    "привет",
    "line\nbreak",
];

#[test]
fn construction_fails_on_empty_credentials() {
    for (login, secret) in [("", "s"), ("l", ""), ("", "")] {
        let err = Credentials::new(login, secret).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}

#[test]
fn verify_accepts_every_fresh_signature() {
    let s = signer("s3cr3t");
    for body in BODIES {
        for ts in [0, 1, 1000, 1_700_000_000, u64::MAX] {
            let sig = s.build_signature(ts, body);
            assert!(s.verify_signature(&sig, ts, body), "ts={ts} body={body:?}");
        }
    }
}

#[test]
fn no_collisions_across_inputs() {
    let mut seen = HashSet::new();
    for secret in ["s3cr3t", "s3cr3u", "x"] {
        let s = signer(secret);
        for body in BODIES {
            for ts in [999, 1000, 1001] {
                assert!(
                    seen.insert(s.build_signature(ts, body)),
                    "collision for secret={secret} ts={ts} body={body:?}"
                );
            }
        }
    }
}

#[test]
fn single_byte_body_change_changes_signature() {
    let s = signer("s3cr3t");
    let body = r#"{"ops":[{"ref":"a"}]}"#;
    let base = s.build_signature(1000, body);
    for i in 0..body.len() {
        let mut bytes = body.as_bytes().to_vec();
        bytes[i] ^= 0x01;
        let mutated = String::from_utf8(bytes).unwrap();
        assert_ne!(s.build_signature(1000, &mutated), base, "byte {i}");
    }
}

#[test]
fn pinned_url_vector() {
    assert_eq!(
        signer("s3cr3t").build_url(1000, "{}"),
        "https://example.com/api/1/json/L/1000/2e8052c09f37ac00aa2c039745f8f84c0c642feb"
    );
}

#[test]
fn default_host_is_production() {
    let s = RequestSigner::new(Credentials::new("L", "s3cr3t").unwrap(), ApiConfig::default())
        .unwrap();
    assert!(
        s.build_url(1000, "{}")
            .starts_with("https://www.corezoid.com/api/1/json/L/1000/")
    );
}
