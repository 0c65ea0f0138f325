use tokio::signal;

use nr_sweep_core::prelude::ShutdownHandle;

/// Spawn a Ctrl-C listener that broadcasts shutdown to the sweep workers.
///
/// Workers finish their in-flight simulator run and stop before taking the
/// next job; the queue is left undrained.
pub(crate) fn start_shutdown_listener(
    runtime: &tokio::runtime::Runtime,
) -> anyhow::Result<ShutdownHandle> {
    let handle = ShutdownHandle::default();

    let listener_handle = handle.clone();
    runtime.spawn(async move {
        signal::ctrl_c()
            .await
            .expect("Failed to receive Ctrl-C signal");
        listener_handle.shutdown();
        println!("Received shutdown signal, letting in-flight simulations finish...");
    });

    Ok(handle)
}
