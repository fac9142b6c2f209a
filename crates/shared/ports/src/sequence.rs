/// Port for the external identifier source
///
/// Issues globally unique, roughly time-ordered identifiers on demand.
/// The matching core calls this for every trade it creates and otherwise
/// treats identifiers as opaque strings.
pub trait SequenceSource: Send + Sync {
    /// Issue the next identifier
    fn next_id(&self) -> String;
}
