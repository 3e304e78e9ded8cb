use std::sync::Arc;
use std::thread;
use std::time::Duration;

use modelkit_type::{ModelType, TypeDescriptor};
use proptest::prelude::*;

use super::{ModelView, ViewAccess};
use crate::lease::LeaseSlot;
use crate::path::ModelPath;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_views_are_send_sync() {
	assert_send_sync::<ModelView<Vec<String>>>();
	assert_send_sync::<ModelView<i64>>();
}

/// `List<String>` over an empty list: descriptor and instance come back
/// unchanged, and close is repeatable.
#[test]
fn test_empty_list_view() {
	let ty = ModelType::<Vec<String>>::of();
	let instance = Arc::new(Vec::new());
	let mut view = ModelView::new(ty.clone(), Some(Arc::clone(&instance)));

	assert_eq!(view.model_type(), &ty);
	assert_eq!(view.model_type().to_string(), "List<String>");
	assert!(Arc::ptr_eq(view.instance().unwrap(), &instance));
	assert!(Arc::ptr_eq(view.instance().unwrap(), view.instance().unwrap()));
	assert_eq!(view.get(), Some(&Vec::new()));

	view.close();
	view.close();
	view.close();
	assert!(!view.is_closed());
	assert!(Arc::ptr_eq(view.instance().unwrap(), &instance));
}

#[test]
fn test_absent_instance() {
	let view = ModelView::new(ModelType::<i64>::of(), None);
	assert!(view.instance().is_none());
	assert!(view.get().is_none());
	assert_eq!(view.model_type().descriptor(), &TypeDescriptor::named("i64"));
}

#[test]
fn test_factory_matches_constructor() {
	let ty = ModelType::<String>::of();
	let instance = Arc::new("app".to_string());
	let a = ModelView::new(ty.clone(), Some(Arc::clone(&instance)));
	let b = ModelView::of(ty, Some(Arc::clone(&instance)));

	assert!(!std::ptr::eq(&a, &b));
	assert_eq!(a.model_type(), b.model_type());
	assert!(Arc::ptr_eq(a.instance().unwrap(), b.instance().unwrap()));
	assert_eq!(a.access(), ViewAccess::ReadOnly);
	assert_eq!(b.access(), ViewAccess::ReadOnly);
	assert!(a.lease().is_none());
}

#[test]
fn test_unchecked_descriptor_is_kept_verbatim() {
	let raw = TypeDescriptor::generic("Provider", [TypeDescriptor::named("Task")]);
	let ty = ModelType::<u32>::from_descriptor_unchecked(raw.clone());
	let view = ModelView::new(ty, Some(Arc::new(7)));
	assert_eq!(view.model_type().descriptor(), &raw);
	assert_eq!(view.get(), Some(&7));
}

#[test]
fn test_concurrent_reads() {
	let instance = Arc::new(vec![1_u8, 2, 3]);
	let view = Arc::new(ModelView::new(
		ModelType::<Vec<u8>>::of(),
		Some(Arc::clone(&instance)),
	));

	let handles: Vec<_> = (0..4)
		.map(|_| {
			let view = Arc::clone(&view);
			let instance = Arc::clone(&instance);
			thread::spawn(move || {
				for _ in 0..100 {
					assert!(Arc::ptr_eq(view.instance().unwrap(), &instance));
					assert_eq!(view.model_type().to_string(), "List<u8>");
				}
			})
		})
		.collect();
	for handle in handles {
		handle.join().unwrap();
	}
}

#[test]
fn test_write_locked_close_releases_once() {
	let slot = Arc::new(LeaseSlot::default());
	let path: ModelPath = "tasks.build".parse().unwrap();
	let lease = slot.acquire(&path, Duration::ZERO, false).unwrap();
	let mut view = ModelView::write_locked(ModelType::<bool>::of(), Some(Arc::new(true)), lease);

	assert_eq!(view.access(), ViewAccess::WriteLocked);
	assert_eq!(view.lease().unwrap().path(), &path);
	assert!(slot.is_held());

	view.close();
	assert!(view.is_closed());
	assert!(!slot.is_held());
	assert!(view.lease().is_none());
	assert_eq!(view.get(), Some(&true));

	// A later holder must not be released by a repeated close.
	let next = slot.acquire(&path, Duration::ZERO, false).unwrap();
	view.close();
	assert!(slot.is_held());
	drop(next);
}

#[test]
fn test_drop_releases_unclosed_lease() {
	let slot = Arc::new(LeaseSlot::default());
	let path: ModelPath = "settings".parse().unwrap();

	fn early_return(slot: &Arc<LeaseSlot>, path: &ModelPath) -> Result<(), &'static str> {
		let lease = slot.acquire(path, Duration::ZERO, true).map_err(|_| "busy")?;
		let _view = ModelView::write_locked(ModelType::<String>::of(), None, lease);
		Err("rule failed")
	}

	assert_eq!(early_return(&slot, &path), Err("rule failed"));
	assert!(!slot.is_held());
}

proptest! {
	/// Any descriptor and instance survive construction unchanged.
	#[test]
	fn prop_view_preserves_pair(
		base in "[A-Za-z][A-Za-z0-9]{0,6}",
		value in proptest::option::of(any::<i64>()),
	) {
		let ty = ModelType::<i64>::from_descriptor_unchecked(TypeDescriptor::named(base));
		let instance = value.map(Arc::new);
		let first = ModelView::new(ty.clone(), instance.clone());
		let second = ModelView::of(ty.clone(), instance.clone());

		for view in [&first, &second] {
			prop_assert_eq!(view.model_type(), &ty);
			match (view.instance(), instance.as_ref()) {
				(Some(got), Some(want)) => prop_assert!(Arc::ptr_eq(got, want)),
				(None, None) => {}
				_ => prop_assert!(false, "instance presence changed"),
			}
		}
	}
}
