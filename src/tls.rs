//! TLS module
//!
//! Loads the server certificate and key from their well-known PEM paths and
//! builds the rustls config for the listener. Also provides the one-shot
//! self-signed certificate generation behind the `--gencert` run mode.

use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use time::OffsetDateTime;

/// Build a rustls server config from PEM cert/key files
pub fn load_server_config(cert_path: &Path, key_path: &Path) -> io::Result<rustls::ServerConfig> {
    let certs = load_cert_chain(cert_path)?;
    let key = load_private_key(key_path)?;

    rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))
}

fn load_cert_chain(path: &Path) -> io::Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let certs: Result<Vec<_>, _> = CertificateDer::pem_reader_iter(reader).collect();
    let certs =
        certs.map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    if certs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("No certificates found in {}", path.display()),
        ));
    }

    Ok(certs)
}

fn load_private_key(path: &Path) -> io::Result<PrivateKeyDer<'static>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let keys: Result<Vec<_>, _> = PrivateKeyDer::pem_reader_iter(reader).collect();
    let keys = keys.map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    keys.into_iter().next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("No private keys found in {}", path.display()),
        )
    })
}

/// Generate a self-signed certificate/key pair for a hostname
///
/// Writes the PEM pair to the given paths (key owner-only) and returns;
/// the caller exits without starting the server.
pub fn generate_cert(
    cert_path: &Path,
    key_path: &Path,
    hostname: &str,
    organization: &str,
) -> io::Result<()> {
    let mut params = CertificateParams::new(vec![hostname.to_owned()])
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, hostname);
    if !organization.is_empty() {
        dn.push(DnType::OrganizationName, organization);
    }
    params.distinguished_name = dn;

    let now = OffsetDateTime::now_utc();
    params.not_before = now - time::Duration::seconds(60);
    params.not_after = now + time::Duration::days(365);

    let key_pair =
        KeyPair::generate().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let cert = params
        .self_signed(&key_pair)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    std::fs::write(cert_path, cert.pem())?;
    std::fs::write(key_path, key_pair.serialize_pem())?;
    restrict_to_owner(key_path)?;

    Ok(())
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_pair_loads_as_server_config() {
        let dir = tempfile::tempdir().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");

        generate_cert(&cert_path, &key_path, "localhost", "").unwrap();
        assert!(load_server_config(&cert_path, &key_path).is_ok());
    }

    #[test]
    fn test_generate_cert_with_organization() {
        let dir = tempfile::tempdir().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");

        generate_cert(&cert_path, &key_path, "wiki.example.com", "Example Org").unwrap();

        let pem = std::fs::read_to_string(&cert_path).unwrap();
        assert!(pem.contains("BEGIN CERTIFICATE"));
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");
        generate_cert(&cert_path, &key_path, "localhost", "").unwrap();

        let mode = std::fs::metadata(&key_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_missing_cert_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("cert.pem");
        let also_missing = dir.path().join("key.pem");

        assert!(load_server_config(&missing, &also_missing).is_err());
    }
}
