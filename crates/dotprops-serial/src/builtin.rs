//! Built-in translators registered by [`TranslatorRegistry::new`](crate::TranslatorRegistry::new).

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};

use dotprops_store::{child_key, Properties, ScalarKind};
use uuid::Uuid;

use crate::error::{SerialError, SerialResult};
use crate::translation::Translator;

/// Stores a [`Uuid`] as two signed 64-bit halves: `key.most` and `key.least`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidTranslator;

impl Translator for UuidTranslator {
    type Value = Uuid;

    fn serialize(&self, key: &str, properties: &mut Properties, value: &Uuid) -> SerialResult<()> {
        let (most, least) = value.as_u64_pair();
        properties.append_long(&child_key(key, "most"), most as i64)?;
        properties.append_long(&child_key(key, "least"), least as i64)?;
        Ok(())
    }

    fn deserialize(&self, key: &str, properties: &Properties) -> SerialResult<Uuid> {
        let most = read_long(properties, &child_key(key, "most"))?;
        let least = read_long(properties, &child_key(key, "least"))?;
        Ok(Uuid::from_u64_pair(most as u64, least as u64))
    }
}

/// Stores a [`SocketAddr`] as `key.host` (IP literal) and `key.port`.
///
/// An IPv6 address with a non-zero scope id also writes `key.scope`. The IPv6
/// flow label is not stored and reads back as zero.
///
/// On read, an absent or empty host means the unspecified IPv4 address, and a
/// host that is not an IP literal is resolved as a host name.
#[derive(Clone, Copy, Debug, Default)]
pub struct SocketAddrTranslator;

impl Translator for SocketAddrTranslator {
    type Value = SocketAddr;

    fn serialize(
        &self,
        key: &str,
        properties: &mut Properties,
        value: &SocketAddr,
    ) -> SerialResult<()> {
        properties.append_string(&child_key(key, "host"), value.ip().to_string())?;
        properties.append_int(&child_key(key, "port"), i32::from(value.port()))?;
        if let SocketAddr::V6(v6) = value {
            if v6.scope_id() != 0 {
                properties.append_long(&child_key(key, "scope"), i64::from(v6.scope_id()))?;
            }
        }
        Ok(())
    }

    fn deserialize(&self, key: &str, properties: &Properties) -> SerialResult<SocketAddr> {
        let port_key = child_key(key, "port");
        let port = properties
            .get_int(&port_key)
            .and_then(|p| u16::try_from(p).ok())
            .ok_or(SerialError::MissingField { key: port_key })?;

        let mut addr = match properties.get_string(&child_key(key, "host")) {
            None | Some("") => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
            Some(host) => match host.parse::<IpAddr>() {
                Ok(ip) => SocketAddr::new(ip, port),
                Err(_) => resolve(host, port)?,
            },
        };

        if let SocketAddr::V6(v6) = &mut addr {
            let scope_key = child_key(key, "scope");
            if let Some(scope) = properties.get_long(&scope_key) {
                let scope = u32::try_from(scope).map_err(|_| SerialError::Coercion {
                    raw: scope.to_string(),
                    key: scope_key,
                    expected: ScalarKind::Long,
                })?;
                v6.set_scope_id(scope);
            }
        }
        Ok(addr)
    }
}

fn read_long(properties: &Properties, key: &str) -> SerialResult<i64> {
    properties
        .get_long(key)
        .ok_or_else(|| SerialError::MissingField { key: key.to_string() })
}

fn resolve(host: &str, port: u16) -> SerialResult<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| SerialError::Decode(format!("cannot resolve host {host:?}: {e}")))?
        .next()
        .ok_or_else(|| SerialError::Decode(format!("host {host:?} resolved to no address")))
}
