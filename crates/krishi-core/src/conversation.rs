//! Chat transcript with delayed assistant replies
//!
//! A user message is appended as soon as it is submitted. The reply is
//! computed at the same moment but only appended once the reply delay has
//! passed, so front ends can show a "typing" state in between. Delivery is
//! handled by one scheduler task per conversation; the transcript lives in a
//! `watch` channel so every append also wakes subscribers.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::corpus::FaqEntry;
use crate::faq::FaqEngine;
use crate::language::{LocalizedText, Resolver};
use crate::state::{ChatMessage, ChatRole};

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

const MIN_REPLY_DELAY: Duration = Duration::from_millis(1);

pub fn greeting_message() -> LocalizedText {
    LocalizedText::new(
        "नमस्ते! मैं कृषि सहयोग का AI सहायक हूं। मैं आपकी खेती और सरकारी योजनाओं के बारे में मदद कर सकता हूं।",
        "Hello! I am KrishiSahyog AI Assistant. I can help you with farming and government schemes.",
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingReply,
}

/// Everything a renderer needs: the messages so far and how many replies are still due
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub messages: Vec<ChatMessage>,
    pub pending: usize,
}

#[derive(Debug)]
struct ScheduledReply {
    due: Instant,
    seq: u64,
    message: ChatMessage,
}

// BinaryHeap is a max-heap; invert so the earliest (due, seq) is on top
impl Ord for ScheduledReply {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledReply {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledReply {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for ScheduledReply {}

pub struct Conversation {
    engine: Arc<FaqEngine>,
    transcript: Arc<watch::Sender<Transcript>>,
    scheduler_tx: mpsc::UnboundedSender<ScheduledReply>,
    scheduler: JoinHandle<()>,
    delay: Duration,
    next_seq: u64,
}

impl Conversation {
    /// Start a session. Must be called inside a tokio runtime.
    ///
    /// The greeting is resolved once, in the language active right now.
    pub fn new(engine: Arc<FaqEngine>, resolver: &Resolver, delay: Duration) -> Self {
        let greeting = ChatMessage {
            role: ChatRole::Assistant,
            content: resolver.resolve(&greeting_message()).to_string(),
        };
        let (transcript, _) = watch::channel(Transcript {
            messages: vec![greeting],
            pending: 0,
        });
        let transcript = Arc::new(transcript);

        let (scheduler_tx, scheduler_rx) = mpsc::unbounded_channel();
        let scheduler = tokio::spawn(run_scheduler(scheduler_rx, Arc::clone(&transcript)));

        Self {
            engine,
            transcript,
            scheduler_tx,
            scheduler,
            delay: delay.max(MIN_REPLY_DELAY),
            next_seq: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `false` (and does nothing) for blank input
    pub fn submit_user_text(&mut self, text: &str, resolver: &Resolver) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let reply = self.engine.answer(text, resolver);
        tracing::info!(
            matched = reply.category.is_some(),
            category = reply.category.map(|c| c.key()).unwrap_or("none"),
            "user question submitted"
        );
        self.exchange(text.to_string(), reply.content);
        true
    }

    /// Ask a suggested question. Always answered with the entry's own answer.
    pub fn submit_suggested(&mut self, entry: &FaqEntry, resolver: &Resolver) {
        tracing::info!(id = entry.id, "suggested question submitted");
        self.exchange(
            resolver.resolve(&entry.question).to_string(),
            resolver.resolve(&entry.answer).to_string(),
        );
    }

    fn exchange(&mut self, question: String, answer: String) {
        self.transcript.send_modify(|t| {
            t.messages.push(ChatMessage {
                role: ChatRole::User,
                content: question,
            });
            t.pending += 1;
        });

        let scheduled = ScheduledReply {
            due: Instant::now() + self.delay,
            seq: self.next_seq,
            message: ChatMessage {
                role: ChatRole::Assistant,
                content: answer,
            },
        };
        self.next_seq += 1;

        if self.scheduler_tx.send(scheduled).is_err() {
            // Only happens if the scheduler task panicked
            tracing::error!("reply scheduler is gone, reply dropped");
            self.transcript.send_modify(|t| t.pending -= 1);
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.borrow().messages.clone()
    }

    pub fn len(&self) -> usize {
        self.transcript.borrow().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending(&self) -> usize {
        self.transcript.borrow().pending
    }

    pub fn state(&self) -> ConversationState {
        if self.pending() > 0 {
            ConversationState::AwaitingReply
        } else {
            ConversationState::Idle
        }
    }

    /// Receiver that is marked changed on every append
    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.transcript.subscribe()
    }

    /// Wait until every submitted question has its reply in the transcript
    pub async fn settled(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = rx.wait_for(|t| t.pending == 0).await;
    }
}

impl Drop for Conversation {
    fn drop(&mut self) {
        self.scheduler.abort();
    }
}

async fn run_scheduler(
    mut rx: mpsc::UnboundedReceiver<ScheduledReply>,
    transcript: Arc<watch::Sender<Transcript>>,
) {
    let mut queue: BinaryHeap<ScheduledReply> = BinaryHeap::new();

    loop {
        let next_due = queue.peek().map(|s| s.due);

        tokio::select! {
            // Drain submissions first so equal deadlines keep submission order
            biased;

            incoming = rx.recv() => match incoming {
                Some(scheduled) => queue.push(scheduled),
                None => break,
            },

            _ = tokio::time::sleep_until(next_due.unwrap_or_else(Instant::now)), if next_due.is_some() => {
                let now = Instant::now();
                let mut due = Vec::new();
                while queue.peek().is_some_and(|s| s.due <= now) {
                    if let Some(scheduled) = queue.pop() {
                        due.push(scheduled.message);
                    }
                }

                let delivered = due.len();
                transcript.send_modify(|t| {
                    t.messages.extend(due);
                    t.pending = t.pending.saturating_sub(delivered);
                });
                tracing::debug!(delivered, "assistant replies appended");
            }
        }
    }
}
