//! Network link trait

use crate::config::WifiConfig;

/// Errors from the network link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The link did not come up within its budget
    Timeout,
    /// The access point rejected the association
    Rejected,
    /// The radio driver reported an error
    Driver,
}

/// Station-mode network link
pub trait NetworkLink {
    /// Start one association attempt with the given credentials
    ///
    /// Returning `Ok` means the attempt was accepted by the driver; the
    /// link is usable once [`is_connected`](Self::is_connected) reports
    /// true (associated and addressed).
    fn connect(
        &mut self,
        wifi: &WifiConfig,
    ) -> impl core::future::Future<Output = Result<(), LinkError>>;

    /// Whether the link is associated and has an address
    fn is_connected(&self) -> bool;
}
