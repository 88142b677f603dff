//! Codec integration tests
//!
//! Agent and server codecs are built the way the binaries build them, from
//! configuration and PEM files on disk.

#[cfg(test)]
mod tests {
    use crate::common::{BatchFactory, KeyPair};
    use metrix_rs::agent::build_codec;
    use metrix_rs::config::AgentConfig;
    use metrix_rs::core::codec::PrivateKey;
    use metrix_rs::{MetricsError, PayloadCodec};

    async fn agent_codec(key: Option<&str>, public_key: Option<String>) -> PayloadCodec {
        let config = AgentConfig {
            key: key.map(str::to_string),
            crypto_key: public_key,
            ..Default::default()
        };
        build_codec(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_encrypted_signed_batch_reaches_server_codec() {
        let keys = KeyPair::generate();
        let agent = agent_codec(Some("secret"), Some(keys.public_path())).await;
        assert!(agent.signs());
        assert!(agent.encrypts());

        let server = PayloadCodec::new()
            .with_sign_key(Some("secret".to_string()))
            .with_private_key(PrivateKey::from_file(&keys.private_path).await.unwrap());

        let batch = BatchFactory::gauges(40);
        let encoded = agent.encode(&batch).unwrap();
        let decoded = server
            .decode(&encoded.body, true, encoded.signature.as_deref())
            .unwrap();
        assert_eq!(decoded, batch);
    }

    #[tokio::test]
    async fn test_wrong_private_key_fails_decryption() {
        let keys = KeyPair::generate();
        let other = KeyPair::generate();
        let agent = agent_codec(None, Some(keys.public_path())).await;
        let server = PayloadCodec::new()
            .with_private_key(PrivateKey::from_file(&other.private_path).await.unwrap());

        let encoded = agent.encode(&BatchFactory::basic()).unwrap();
        let result = server.decode(&encoded.body, true, None);
        assert!(matches!(result, Err(MetricsError::DecryptionFailed(_))));
    }

    #[tokio::test]
    async fn test_different_sign_keys_are_rejected() {
        let agent = agent_codec(Some("agent-key"), None).await;
        let server = PayloadCodec::new().with_sign_key(Some("server-key".to_string()));

        let encoded = agent.encode(&BatchFactory::basic()).unwrap();
        let result = server.decode(&encoded.body, true, encoded.signature.as_deref());
        assert!(matches!(result, Err(MetricsError::SignatureInvalid)));
    }

    #[tokio::test]
    async fn test_unsigned_agent_accepted_by_signing_server() {
        let agent = agent_codec(None, None).await;
        let server = PayloadCodec::new().with_sign_key(Some("secret".to_string()));

        let encoded = agent.encode(&BatchFactory::basic()).unwrap();
        assert!(encoded.signature.is_none());
        let decoded = server.decode(&encoded.body, true, None).unwrap();
        assert_eq!(decoded, BatchFactory::basic());
    }

    #[tokio::test]
    async fn test_missing_key_file_is_reported() {
        let config = AgentConfig {
            crypto_key: Some("/no/such/public.pem".to_string()),
            ..Default::default()
        };
        assert!(build_codec(&config).await.is_err());
    }
}
