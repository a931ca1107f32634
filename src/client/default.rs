//! Optional process-wide default client.

use std::sync::OnceLock;

use crate::{Client, Error};

static DEFAULT_CLIENT: OnceLock<Client> = OnceLock::new();

/// Installs the process-wide default client.
///
/// The default can be set exactly once; a second call returns a
/// configuration error and leaves the first client in place. Passing
/// clients explicitly is preferred; the default exists for code paths (such
/// as framework glue) that cannot thread a client through.
pub fn set_default(client: Client) -> Result<(), Error> {
    DEFAULT_CLIENT
        .set(client)
        .map_err(|_| Error::configuration("default client is already set"))
}

/// Returns a clone of the process-wide default client.
pub fn default_client() -> Result<Client, Error> {
    DEFAULT_CLIENT.get().cloned().ok_or_else(|| {
        Error::configuration("no default client set; call warrant::client::set_default first")
    })
}
