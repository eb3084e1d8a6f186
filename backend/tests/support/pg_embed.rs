//! Process-wide embedded PostgreSQL cluster.

use pg_embedded_setup_unpriv::ClusterHandle;

const EMBEDDED_PASSWORD: &str = "notes_embedded_test";

/// Return the shared cluster, bootstrapping it on first use.
///
/// Pins `PG_PASSWORD` first: a reused data directory keeps the password it
/// was initialised with, and the library otherwise generates a fresh one per
/// process.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns threads; the
        // library serialises the singleton behind a mutex.
        unsafe {
            std::env::set_var("PG_PASSWORD", EMBEDDED_PASSWORD);
        }
    }
    pg_embedded_setup_unpriv::test_support::shared_cluster_handle().map_err(|err| format!("{err:?}"))
}
