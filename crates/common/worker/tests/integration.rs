// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use amq_mq::{ERROR_QUEUE_NAME, ErrorRecord, Message, QueueRegistry};
use amq_worker::{WorkOutcome, WorkerGroup, WorkerRegistry, signals::TERMINATE};

#[tokio::test]
async fn producer_and_consumer_exchange_messages_through_a_queue() {
    let queues = Arc::new(QueueRegistry::new());
    queues.create("pipeline").unwrap();
    let workers = Arc::new(WorkerRegistry::new());

    let produced = Arc::new(AtomicU32::new(0));
    let producer_queues = Arc::clone(&queues);
    let producer_count = Arc::clone(&produced);
    let producer = workers
        .producer_create(Some("producer".to_string()), move |_ctx: &_| {
            let next = producer_count.fetch_add(1, Ordering::SeqCst);
            let _ = producer_queues.post("pipeline", Message::new(next));
            WorkOutcome::Continue
        })
        .unwrap();

    let consumed = Arc::new(AtomicU32::new(0));
    let consumer_total = Arc::clone(&consumed);
    let consumer = workers
        .consumer_create::<u32>(Arc::clone(&queues), "pipeline", Some("consumer".to_string()), move |_ctx: &_, value: u32| {
            consumer_total.fetch_add(value, Ordering::SeqCst);
            WorkOutcome::Continue
        })
        .unwrap();

    while consumed.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    producer.sigset(TERMINATE);
    producer.wait().await;
    consumer.sigset(TERMINATE);
    consumer.wait().await;

    assert!(workers.snapshot_names().is_empty());
}

#[tokio::test]
async fn worker_group_broadcasts_terminate_and_waits_for_all_members() {
    let queues = Arc::new(QueueRegistry::new());
    queues.create("q").unwrap();
    let workers = Arc::new(WorkerRegistry::new());

    let mut group = WorkerGroup::new("consumers");
    for i in 0..3 {
        let name = format!("consumer-{i}");
        workers
            .consumer_create::<u32>(Arc::clone(&queues), "q", Some(name.clone()), |_ctx: &_, _value: u32| {
                WorkOutcome::Continue
            })
            .unwrap();
        group.add_worker(name);
    }

    assert_eq!(workers.snapshot_names().len(), 3);

    group.sigset(&workers, TERMINATE);
    group.wait(&workers).await;

    assert!(workers.snapshot_names().is_empty());
}

#[tokio::test]
async fn suspended_producer_does_not_post_until_resumed() {
    let queues = Arc::new(QueueRegistry::new());
    queues.create("q").unwrap();
    let workers = Arc::new(WorkerRegistry::new());

    let producer_queues = Arc::clone(&queues);
    let producer = workers
        .producer_create(Some("p".to_string()), move |_ctx: &_| {
            let _ = producer_queues.post("q", Message::new(1u32));
            WorkOutcome::Continue
        })
        .unwrap();

    producer.sigset(amq_worker::signals::SUSPEND);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(queues.count("q"), 0);

    producer.sigclr(amq_worker::signals::SUSPEND);
    while queues.count("q") == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    producer.sigset(TERMINATE);
    producer.wait().await;
}

#[tokio::test]
async fn one_producer_fans_out_to_multiple_consumers_on_the_same_queue() {
    let queues = Arc::new(QueueRegistry::new());
    queues.create("fanout").unwrap();
    let workers = Arc::new(WorkerRegistry::new());

    let produced = Arc::new(AtomicU32::new(0));
    let producer_queues = Arc::clone(&queues);
    let producer_count = Arc::clone(&produced);
    let producer = workers
        .producer_create(Some("fanout-producer".to_string()), move |_ctx: &_| {
            let next = producer_count.fetch_add(1, Ordering::SeqCst);
            let _ = producer_queues.post("fanout", Message::new(next));
            WorkOutcome::Continue
        })
        .unwrap();

    let received = Arc::new(AtomicU32::new(0));
    let mut consumers = Vec::new();
    for i in 0..3 {
        let counter = Arc::clone(&received);
        let consumer = workers
            .consumer_create::<u32>(
                Arc::clone(&queues),
                "fanout",
                Some(format!("fanout-consumer-{i}")),
                move |_ctx: &_, _value: u32| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    WorkOutcome::Continue
                },
            )
            .unwrap();
        consumers.push(consumer);
    }

    while received.load(Ordering::SeqCst) < 3 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    producer.sigset(TERMINATE);
    producer.wait().await;
    for consumer in consumers {
        consumer.sigset(TERMINATE);
        consumer.wait().await;
    }

    assert!(workers.snapshot_names().is_empty());
}

#[tokio::test]
async fn multiple_producers_fan_in_to_a_single_consumer() {
    let queues = Arc::new(QueueRegistry::new());
    queues.create("fanin").unwrap();
    let workers = Arc::new(WorkerRegistry::new());

    let mut producers = Vec::new();
    for i in 0..3 {
        let producer_queues = Arc::clone(&queues);
        let producer = workers
            .producer_create(Some(format!("fanin-producer-{i}")), move |_ctx: &_| {
                let _ = producer_queues.post("fanin", Message::new(i as u32));
                WorkOutcome::Continue
            })
            .unwrap();
        producers.push(producer);
    }

    let received = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&received);
    let consumer = workers
        .consumer_create::<u32>(
            Arc::clone(&queues),
            "fanin",
            Some("fanin-consumer".to_string()),
            move |_ctx: &_, _value: u32| {
                counter.fetch_add(1, Ordering::SeqCst);
                WorkOutcome::Continue
            },
        )
        .unwrap();

    while received.load(Ordering::SeqCst) < 3 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    for producer in producers {
        producer.sigset(TERMINATE);
        producer.wait().await;
    }
    consumer.sigset(TERMINATE);
    consumer.wait().await;

    assert!(workers.snapshot_names().is_empty());
}

#[tokio::test]
async fn a_worker_can_consume_error_records_posted_to_the_reserved_error_queue() {
    let queues = Arc::new(QueueRegistry::new());
    queues.create(ERROR_QUEUE_NAME).unwrap();
    let workers = Arc::new(WorkerRegistry::new());

    queues
        .post(
            ERROR_QUEUE_NAME,
            Message::new(ErrorRecord::at(file!(), line!(), -1, "disk full")),
        )
        .unwrap();

    let observed = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&observed);
    let consumer = workers
        .consumer_create::<ErrorRecord>(
            Arc::clone(&queues),
            ERROR_QUEUE_NAME,
            Some("error-watcher".to_string()),
            move |_ctx: &_, record: ErrorRecord| {
                assert_eq!(record.code, -1);
                assert!(record.message.contains("[code:-1]"));
                counter.fetch_add(1, Ordering::SeqCst);
                WorkOutcome::Continue
            },
        )
        .unwrap();

    while observed.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    consumer.sigset(TERMINATE);
    consumer.wait().await;
}

#[tokio::test]
async fn consumer_create_fails_fast_when_the_supply_queue_does_not_exist() {
    let queues = Arc::new(QueueRegistry::new());
    let workers = Arc::new(WorkerRegistry::new());

    let err = workers
        .consumer_create::<u32>(Arc::clone(&queues), "missing", None, |_ctx: &_, _value: u32| {
            WorkOutcome::Continue
        })
        .unwrap_err();

    assert!(matches!(err, amq_error::Error::MissingQueue { .. }));
    assert!(workers.snapshot_names().is_empty());
}
