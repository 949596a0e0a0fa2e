/// Partial update of an optional field.
///
/// Used by patches where "leave alone" and "clear" must be distinguishable,
/// such as a card description:
///
/// ```
/// use taskflow_domain::FieldUpdate;
///
/// let mut description = Some("Outline tasks".to_string());
/// FieldUpdate::NoChange.apply_to(&mut description);
/// assert_eq!(description.as_deref(), Some("Outline tasks"));
///
/// FieldUpdate::<String>::Clear.apply_to(&mut description);
/// assert_eq!(description, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    NoChange,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::NoChange
    }
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `Some` sets the field, `None` clears it.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}
