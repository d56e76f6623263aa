use crate::Blob;

/// The result of looking a key up in a store.
///
/// `Absent` is a real answer ("the store has nothing under this key"), which
/// is why the local overlay can memoize it. A key that was never looked up
/// simply has no `Entry` at all.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Entry {
	Present(Blob),
	#[default]
	Absent,
}

impl Entry {
	#[must_use]
	pub fn is_present(&self) -> bool {
		matches!(self, Entry::Present(_))
	}

	#[must_use]
	pub fn is_absent(&self) -> bool {
		matches!(self, Entry::Absent)
	}

	#[must_use]
	pub fn value(&self) -> Option<&Blob> {
		match self {
			Entry::Present(value) => Some(value),
			Entry::Absent => None,
		}
	}

	#[must_use]
	pub fn into_value(self) -> Option<Blob> {
		match self {
			Entry::Present(value) => Some(value),
			Entry::Absent => None,
		}
	}
}

impl From<Option<Blob>> for Entry {
	fn from(value: Option<Blob>) -> Self {
		value.map_or(Entry::Absent, Entry::Present)
	}
}

impl From<Blob> for Entry {
	fn from(value: Blob) -> Self {
		Entry::Present(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn present_and_absent() {
		let present = Entry::from(Blob::from("v"));
		assert!(present.is_present());
		assert_eq!(present.value(), Some(&Blob::from("v")));
		assert_eq!(present.into_value(), Some(Blob::from("v")));

		let absent = Entry::from(None);
		assert!(absent.is_absent());
		assert_eq!(absent.value(), None);
		assert_eq!(absent, Entry::default());
	}
}
