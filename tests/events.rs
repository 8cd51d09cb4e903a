mod tests {
    use lamparray_director::events::{EventQueue, QueueEmpty};

    #[test]
    fn test_strict_send_fails_when_full() {
        let queue: EventQueue<u32, 2> = EventQueue::new();
        queue.try_send(1).unwrap();
        queue.try_send(2).unwrap();

        let err = queue.try_send(3).unwrap_err();
        assert_eq!(err.0, 3);

        assert_eq!(queue.try_receive(), Ok(1));
        assert_eq!(queue.try_receive(), Ok(2));
        assert_eq!(queue.try_receive(), Err(QueueEmpty));
    }

    #[test]
    fn test_lossy_send_evicts_oldest() {
        let queue: EventQueue<u32, 2> = EventQueue::new();
        queue.send_latest(1);
        queue.send_latest(2);
        queue.send_latest(3);

        // Oldest entry was dropped; the latest state survives.
        assert_eq!(queue.try_receive(), Ok(2));
        assert_eq!(queue.try_receive(), Ok(3));
        assert!(queue.is_empty());
    }
}
