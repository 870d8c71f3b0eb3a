//! Realtime change notification and client-cache invalidation

pub mod cache;
pub mod feed;
pub mod router;

pub use cache::*;
pub use feed::*;
pub use router::*;

use serde::{Deserialize, Serialize};

/// Resource types tracked by the change notification router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Animals,
    Clients,
    Consultations,
    Appointments,
    Prescriptions,
    Vaccinations,
    Invoices,
    StockItems,
}

impl ResourceType {
    /// All resource types the router tracks
    pub const ALL: [ResourceType; 8] = [
        ResourceType::Animals,
        ResourceType::Clients,
        ResourceType::Consultations,
        ResourceType::Appointments,
        ResourceType::Prescriptions,
        ResourceType::Vaccinations,
        ResourceType::Invoices,
        ResourceType::StockItems,
    ];

    /// Whether changes to this resource also stale the dashboard statistics
    pub fn feeds_dashboard(&self) -> bool {
        matches!(
            self,
            ResourceType::Animals
                | ResourceType::Clients
                | ResourceType::Consultations
                | ResourceType::Appointments
        )
    }
}

/// What happened to a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A backend-delivered notification that a row changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub resource: ResourceType,
    pub change: ChangeKind,
}
