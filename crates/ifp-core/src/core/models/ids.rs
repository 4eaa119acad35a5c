use slotmap::new_key_type;

new_key_type! {
    pub struct AtomId;
    pub struct CompoundId;
    pub struct ChainId;
    pub struct GroupId;
    pub struct InteractionId;
}
