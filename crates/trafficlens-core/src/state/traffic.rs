use std::collections::VecDeque;

use crate::model::PacketEvent;

/// Newest-first packet rows with a fixed capacity.
#[derive(Debug, Clone)]
pub struct TrafficList {
    rows: VecDeque<PacketEvent>,
    capacity: usize,
}

impl TrafficList {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rows: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the head. Returns the row evicted from the tail, if any.
    pub fn push(&mut self, packet: PacketEvent) -> Option<PacketEvent> {
        self.rows.push_front(packet);
        if self.rows.len() > self.capacity {
            self.rows.pop_back()
        } else {
            None
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn newest(&self) -> Option<&PacketEvent> {
        self.rows.front()
    }

    /// Rows from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &PacketEvent> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(n: u64) -> PacketEvent {
        PacketEvent {
            src_ip: format!("10.0.0.{n}"),
            protocol: "TCP".into(),
            length: n,
            is_attack: false,
        }
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut list = TrafficList::new(3);
        for n in 1..=3 {
            assert!(list.push(packet(n)).is_none());
        }
        let evicted = list.push(packet(4));
        assert_eq!(evicted.map(|p| p.length), Some(1));
        assert_eq!(list.len(), 3);

        let order: Vec<u64> = list.iter().map(|p| p.length).collect();
        assert_eq!(order, [4, 3, 2]);
    }

    #[test]
    fn zero_capacity_keeps_one_row() {
        let mut list = TrafficList::new(0);
        list.push(packet(1));
        list.push(packet(2));
        assert_eq!(list.capacity(), 1);
        assert_eq!(list.newest().map(|p| p.length), Some(2));
    }
}
