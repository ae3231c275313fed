/// Port names understood by the storage adapter.
///
/// Inbound ports carry requests from the application; the single outbound
/// port carries Get responses back.
pub mod names {
    pub const GET_ITEM: &str = "storageGetItem";
    pub const SET_ITEM: &str = "storageSetItem";
    pub const REMOVE_ITEM: &str = "storageRemoveItem";
    pub const CLEAR: &str = "storageClear";
    pub const PUSH_TO_SET: &str = "storagePushToSet";
    pub const REMOVE_FROM_SET: &str = "storageRemoveFromSet";

    pub const GET_ITEM_RESPONSE: &str = "storageGetItemResponse";

    /// Diagnostic label emitted when RemoveFromSet finds a non-list value.
    pub const REMOVE_FROM_SET_ABORTED: &str = "storageRemoveFromSet [aborting; not a list]";
}

/// A port whose presence means the storage ports are wired into a host.
pub const SAMPLE_PORT_NAME: &str = names::GET_ITEM;

/// Every inbound port, in registration order.
pub const INBOUND_PORTS: [&str; 6] = [
    names::GET_ITEM,
    names::SET_ITEM,
    names::REMOVE_ITEM,
    names::CLEAR,
    names::PUSH_TO_SET,
    names::REMOVE_FROM_SET,
];
