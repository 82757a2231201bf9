//! Async driver cycles.

mod common;

use common::{handles, publishes_for, recording_tree, root_view};
use scrollseq::{ChildDescriptor, ChildId, Driver, Error, Notification};

#[tokio::test]
async fn test_queued_commands_share_one_cycle() {
    let (mut tree, log) = recording_tree();
    let view = root_view(&mut tree, "main", None);
    let slots: Vec<_> = (0..3).map(|_| tree.create_scope(Some(view)).unwrap()).collect();

    let (driver, handle) = Driver::new(tree);
    let client = async move {
        for (slot, key) in slots.iter().zip([2, 0, 1]) {
            let descriptor = ChildDescriptor::new(ChildId::next(), key, format!("k{}", key));
            handle.notify(*slot, Notification::Register(descriptor)).unwrap();
        }
        handle.sync().await.unwrap()
    };

    let (tree, published) = tokio::join!(driver.run(), client);

    assert_eq!(published, 1);
    let publishes = publishes_for(&log, "main");
    assert_eq!(publishes.len(), 1);
    assert_eq!(handles(&publishes[0]), vec!["k0", "k1", "k2"]);
    assert_eq!(tree.view(view).unwrap().publish_count(), 1);
}

#[tokio::test]
async fn test_awaited_mounts_publish_per_cycle() {
    let (mut tree, log) = recording_tree();
    let view = root_view(&mut tree, "main", Some(0));

    let (driver, handle) = Driver::new(tree);
    let client = async move {
        let b = handle.mount_child(view, 1, "b".to_string()).await.unwrap();
        handle.mount_child(view, 0, "a".to_string()).await.unwrap();
        handle.sync().await.unwrap();
        handle.unmount(b).unwrap();
        handle.sync().await.unwrap();
    };

    tokio::join!(driver.run(), client);

    let publishes = publishes_for(&log, "main");
    assert_eq!(publishes.len(), 3);
    assert_eq!(handles(&publishes[0]), vec!["b"]);
    assert_eq!(publishes[0].start_index, Some(0));
    assert_eq!(handles(&publishes[1]), vec!["a", "b"]);
    assert_eq!(publishes[1].start_index, None);
    assert_eq!(handles(&publishes[2]), vec!["a"]);
}

#[tokio::test]
async fn test_closed_driver_rejects_commands() {
    let (mut tree, _log) = recording_tree();
    let view = root_view(&mut tree, "main", None);

    let (driver, handle) = Driver::new(tree);
    drop(driver);

    assert!(matches!(handle.unmount(view), Err(Error::DriverClosed)));
    assert!(matches!(handle.sync().await, Err(Error::DriverClosed)));
}
