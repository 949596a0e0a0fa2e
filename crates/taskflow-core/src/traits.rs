/// A detached, editable copy of an entity.
///
/// Forms edit the copy freely and write it back in one step, so a
/// half-filled form never touches the stored entity.
pub trait Editable<T>: Sized {
    fn from_entity(entity: &T) -> Self;
    fn apply_to(self, entity: &mut T);
}
