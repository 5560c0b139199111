//! Domain factories for creating domain entities and value objects.

use super::{error::ValueObjectError, value_object::ConnectionId};

/// Factory for generating ConnectionId instances.
///
/// This factory encapsulates the logic for assigning identifiers to live
/// connections, separating the generation concern from the validation
/// logic in ConnectionId.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        ConnectionId::new(uuid.to_string())
    }
}
