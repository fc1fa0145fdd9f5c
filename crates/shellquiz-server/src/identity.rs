//! Host identity.
//!
//! The server authenticates itself with a certificate and private key read
//! from PEM files. When neither file exists a self-signed identity is
//! generated and written to the configured paths, so the next start (and
//! every client pinning the certificate) sees the same identity.
//!
//! # Security
//!
//! Clients pin the exact certificate rather than trusting a CA. Distribute
//! the certificate file to clients out of band.

use std::{fs, io::Write, path::Path, sync::Arc};

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use shellquiz_proto::ALPN_PROTOCOL;

use crate::error::ServerError;

/// Subject name embedded in generated certificates.
pub const GENERATED_SUBJECT: &str = "localhost";

/// Certificate chain and private key presented to clients.
#[derive(Debug)]
pub struct HostIdentity {
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl HostIdentity {
    /// Load the identity, generating and storing one if neither file exists.
    ///
    /// Having only one of the two files is a configuration error.
    pub fn load_or_generate(key_path: &Path, cert_path: &Path) -> Result<Self, ServerError> {
        match (key_path.exists(), cert_path.exists()) {
            (true, true) => Self::load(key_path, cert_path),
            (false, false) => {
                let identity = Self::generate_to(key_path, cert_path)?;
                tracing::warn!(
                    key = %key_path.display(),
                    cert = %cert_path.display(),
                    "generated new self-signed host identity"
                );
                Ok(identity)
            },
            (true, false) => Err(ServerError::Config(format!(
                "host key '{}' exists but certificate '{}' does not",
                key_path.display(),
                cert_path.display()
            ))),
            (false, true) => Err(ServerError::Config(format!(
                "certificate '{}' exists but host key '{}' does not",
                cert_path.display(),
                key_path.display()
            ))),
        }
    }

    /// Load the identity from PEM files.
    pub fn load(key_path: &Path, cert_path: &Path) -> Result<Self, ServerError> {
        let certs = load_certs(cert_path)?;

        let key_pem = fs::read(key_path).map_err(|e| {
            ServerError::Config(format!("failed to read key '{}': {e}", key_path.display()))
        })?;
        let key = rustls_pemfile::private_key(&mut &key_pem[..])
            .map_err(|e| ServerError::Config(format!("failed to parse private key: {e}")))?
            .ok_or_else(|| {
                ServerError::Config(format!("no private key found in '{}'", key_path.display()))
            })?;

        Ok(Self { certs, key })
    }

    /// Generate a self-signed identity in memory.
    pub fn generate() -> Result<Self, ServerError> {
        let (identity, _, _) = generate_pem()?;
        Ok(identity)
    }

    /// Generate a self-signed identity and write it as PEM files.
    fn generate_to(key_path: &Path, cert_path: &Path) -> Result<Self, ServerError> {
        let (identity, cert_pem, key_pem) = generate_pem()?;
        write_file(cert_path, cert_pem.as_bytes(), false)?;
        write_file(key_path, key_pem.as_bytes(), true)?;
        Ok(identity)
    }

    /// Certificate chain, leaf first.
    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certs
    }

    /// TLS 1.3 server configuration presenting this identity.
    pub fn server_config(&self) -> Result<Arc<rustls::ServerConfig>, ServerError> {
        let mut config = rustls::ServerConfig::builder_with_protocol_versions(&[&rustls::version::TLS13])
            .with_no_client_auth()
            .with_single_cert(self.certs.clone(), self.key.clone_key())
            .map_err(|e| ServerError::Config(format!("invalid TLS config: {e}")))?;

        config.alpn_protocols = vec![ALPN_PROTOCOL.to_vec()];
        Ok(Arc::new(config))
    }
}

/// Read every certificate from a PEM file.
pub fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ServerError> {
    let pem = fs::read(path).map_err(|e| {
        ServerError::Config(format!("failed to read cert '{}': {e}", path.display()))
    })?;

    let certs = rustls_pemfile::certs(&mut &pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Config(format!("failed to parse certificates: {e}")))?;

    if certs.is_empty() {
        return Err(ServerError::Config(format!("no certificates found in '{}'", path.display())));
    }
    Ok(certs)
}

/// TLS 1.3 client configuration trusting exactly `pinned`.
pub fn pinned_client_config(
    pinned: &[CertificateDer<'static>],
) -> Result<Arc<rustls::ClientConfig>, ServerError> {
    let mut roots = rustls::RootCertStore::empty();
    for cert in pinned {
        roots
            .add(cert.clone())
            .map_err(|e| ServerError::Config(format!("unusable pinned certificate: {e}")))?;
    }

    let mut config = rustls::ClientConfig::builder_with_protocol_versions(&[&rustls::version::TLS13])
        .with_root_certificates(roots)
        .with_no_client_auth();

    config.alpn_protocols = vec![ALPN_PROTOCOL.to_vec()];
    Ok(Arc::new(config))
}

fn generate_pem() -> Result<(HostIdentity, String, String), ServerError> {
    let generated = rcgen::generate_simple_self_signed(vec![GENERATED_SUBJECT.to_string()])
        .map_err(|e| ServerError::Config(format!("failed to generate self-signed cert: {e}")))?;

    let cert_pem = generated.cert.pem();
    let key_pem = generated.key_pair.serialize_pem();

    let identity = HostIdentity {
        certs: vec![generated.cert.der().clone()],
        key: PrivatePkcs8KeyDer::from(generated.key_pair.serialize_der()).into(),
    };
    Ok((identity, cert_pem, key_pem))
}

fn write_file(path: &Path, contents: &[u8], private: bool) -> Result<(), ServerError> {
    let io_err = |e: std::io::Error| {
        ServerError::Config(format!("failed to write '{}': {e}", path.display()))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    if private {
        owner_only(&mut options);
    }

    let mut file = options.open(path).map_err(io_err)?;
    file.write_all(contents).map_err(io_err)?;
    Ok(())
}

#[cfg(unix)]
fn owner_only(options: &mut fs::OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600);
}

#[cfg(not(unix))]
fn owner_only(_options: &mut fs::OpenOptions) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_then_reloads_same_certificate() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("keys/host_key.pem");
        let cert = dir.path().join("keys/host_cert.pem");

        let generated = HostIdentity::load_or_generate(&key, &cert).unwrap();
        assert!(key.exists());
        assert!(cert.exists());

        let loaded = HostIdentity::load_or_generate(&key, &cert).unwrap();
        assert_eq!(generated.certificates(), loaded.certificates());
        assert!(loaded.server_config().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn generated_key_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("host_key.pem");
        let cert = dir.path().join("host_cert.pem");
        HostIdentity::load_or_generate(&key, &cert).unwrap();

        let mode = fs::metadata(&key).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn rejects_half_configured_identity() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("host_key.pem");
        let cert = dir.path().join("host_cert.pem");
        fs::write(&key, "not a key").unwrap();

        let err = HostIdentity::load_or_generate(&key, &cert).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn rejects_garbage_certificate() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("host_cert.pem");
        fs::write(&cert, "garbage").unwrap();

        assert!(matches!(load_certs(&cert), Err(ServerError::Config(_))));
    }

    #[test]
    fn client_config_pins_certificate() {
        let identity = HostIdentity::generate().unwrap();
        let config = pinned_client_config(identity.certificates()).unwrap();
        assert_eq!(config.alpn_protocols, vec![ALPN_PROTOCOL.to_vec()]);
    }
}
