use crate::imports::*;

pub mod tokenize;

use tokio::sync::mpsc;

/*
    Types:
    * QueueItem - Raw text line or an already-typed invocation
    * DispatchQueue - Single-consumer FIFO owned by the session loop
    * QueueHandle - Cloneable producer side handed to command handlers
*/

#[derive(Debug, Clone, PartialEq)]
pub enum QueueItem {
    Raw(String),
    Typed(Invocation),
}

impl QueueItem {
    pub fn raw(line: impl Into<String>) -> Self {
        Self::Raw(line.into())
    }

    pub fn typed(command: CommandName, parameters: impl ToParameters) -> Self {
        Self::Typed(Invocation {
            command,
            parameters: parameters.to_parameters(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct QueueHandle {
    sender: mpsc::UnboundedSender<QueueItem>,
}

impl QueueHandle {
    /// Appends to the tail. The item runs after everything already queued.
    pub fn put(&self, item: QueueItem) -> Result<()> {
        tracing::debug!(item = ?item, "Queueing follow-up");
        self.sender
            .send(item)
            .map_err(|_| AssistantError::programming("dispatch queue is closed"))
    }
}

#[derive(Debug)]
pub struct DispatchQueue {
    sender: mpsc::UnboundedSender<QueueItem>,
    receiver: mpsc::UnboundedReceiver<QueueItem>,
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn put(&self, item: QueueItem) -> Result<()> {
        self.handle().put(item)
    }

    /// Waits for the next item. The queue keeps its own sender, so it never closes.
    pub async fn get(&mut self) -> Result<QueueItem> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| AssistantError::programming("dispatch queue is closed"))
    }

    pub fn try_get(&mut self) -> Option<QueueItem> {
        self.receiver.try_recv().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_follow_ups_join_the_tail() {
        init_tracing();
        let mut queue = DispatchQueue::new();
        for line in ["A", "B", "C"] {
            queue.put(QueueItem::raw(line)).unwrap();
        }

        let handle = queue.handle();
        let mut drained = Vec::new();
        while !queue.is_empty() {
            let item = queue.get().await.unwrap();
            if item == QueueItem::raw("A") {
                // Processing A enqueues D.
                handle.put(QueueItem::raw("D")).unwrap();
            }
            drained.push(item);
        }

        let expected: Vec<QueueItem> = ["A", "B", "C", "D"].into_iter().map(QueueItem::raw).collect();
        assert_eq!(drained, expected);
        assert!(queue.try_get().is_none());
    }

    #[tokio::test]
    async fn test_typed_items_keep_parameters() {
        let mut queue = DispatchQueue::new();
        let uid = Uuid::now_v7();
        queue
            .put(QueueItem::typed(CommandName::ContactView, params! { "uid" => uid }))
            .unwrap();
        assert_eq!(queue.len(), 1);

        let QueueItem::Typed(invocation) = queue.get().await.unwrap() else {
            panic!("expected a typed item");
        };
        assert_eq!(invocation.command, CommandName::ContactView);
        assert_eq!(invocation.parameters.uid("uid").unwrap(), Some(uid));
    }
}
