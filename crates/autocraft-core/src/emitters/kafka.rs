//! Kafka generators: a single MockProducer test, and a full messaging
//! scaffold (config, clients and tests) under `<base_package>.messaging.kafka`.

use std::path::PathBuf;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tera::Context;

use super::{default_base_dir, render_body};
use crate::artifact::Report;
use crate::java::{JavaUnit, SourceKind};
use crate::templates::{render_template, TemplateId, TemplateStore};
use crate::tools::Generator;
use crate::utils::escape_java_string;

const KAFKA_CONFIG_BODY: &str = r#"private KafkaConfig() {}

public static final String TOPIC = "{{ topic }}";

public static Properties producerProps() {
    Properties p = new Properties();
    p.put("bootstrap.servers", "{{ bootstrap_servers }}");
    p.put("client.id", "{{ client_id }}-producer");
    p.put("acks", "{{ acks }}");
    p.put("key.serializer", StringSerializer.class.getName());
    p.put("value.serializer", StringSerializer.class.getName());
    return p;
}

public static Properties consumerProps() {
    Properties p = new Properties();
    p.put("bootstrap.servers", "{{ bootstrap_servers }}");
    p.put("group.id", "{{ consumer_group }}");
    p.put("auto.offset.reset", "{{ auto_offset_reset }}");
    p.put("key.deserializer", StringDeserializer.class.getName());
    p.put("value.deserializer", StringDeserializer.class.getName());
    return p;
}"#;

const PRODUCER_CLIENT_BODY: &str = r#"private final KafkaProducer<String, String> producer;
private final String topic;

public KafkaProducerClient(Properties props, String topic) {
    this.producer = new KafkaProducer<>(props);
    this.topic = topic;
}

public void send(String key, String jsonValue) {
    producer.send(new ProducerRecord<>(topic, key, jsonValue));
    producer.flush();
}

@Override
public void close() {
    producer.close();
}"#;

const CONSUMER_CLIENT_BODY: &str = r#"private final KafkaConsumer<String, String> consumer;

public KafkaConsumerClient(Properties props, String topic) {
    this.consumer = new KafkaConsumer<>(props);
    this.consumer.subscribe(Collections.singletonList(topic));
}

public ConsumerRecords<String, String> pollOnce(Duration timeout) {
    return consumer.poll(timeout);
}

@Override
public void close() {
    consumer.close();
}"#;

const PRODUCER_TEST_BODY: &str = r#"@Test
void mock_producer_sends_records() {
    MockProducer<String, String> producer =
        new MockProducer<>(true, new StringSerializer(), new StringSerializer());
    producer.send(new ProducerRecord<>("{{ topic }}", "key", "value"));
    Assertions.assertThat(producer.history()).hasSize(1);
    Assertions.assertThat(producer.history().get(0).topic()).isEqualTo("{{ topic }}");
}"#;

const CONSUMER_TEST_BODY: &str = r#"@Test
void mock_consumer_reads_records() {
    MockConsumer<String, String> consumer = new MockConsumer<>(OffsetResetStrategy.EARLIEST);
    TopicPartition tp = new TopicPartition("{{ topic }}", 0);
    Map<TopicPartition, Long> startOffsets = new HashMap<>();
    startOffsets.put(tp, 0L);
    consumer.assign(Collections.singletonList(tp));
    consumer.updateBeginningOffsets(startOffsets);
    consumer.addRecord(new ConsumerRecord<>("{{ topic }}", 0, 0L, "k", "v"));
    ConsumerRecords<String, String> polled = consumer.poll(Duration.ofMillis(10));
    Assertions.assertThat(polled.count()).isEqualTo(1);
}"#;

fn default_mock_class() -> String {
    "KafkaMockTest".to_string()
}

fn default_topic() -> String {
    "orders".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct KafkaMockArgs {
    pub base_package: String,
    #[serde(default = "default_mock_class")]
    pub class_name: String,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Topic the mock producer sends to
    #[serde(default = "default_topic")]
    pub topic: String,
}

pub struct KafkaMockTool {
    store: Arc<TemplateStore>,
}

impl KafkaMockTool {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }
}

impl Generator for KafkaMockTool {
    type Args = KafkaMockArgs;
    const NAME: &'static str = "KafkaMockTool";
    const DESCRIPTION: &'static str =
        "Creates a unit test that demonstrates Kafka MockProducer usage.";

    fn run(&self, args: KafkaMockArgs) -> crate::Result<Report> {
        let mut context = Context::new();
        context.insert("topic", &escape_java_string(&args.topic));
        let body = render_body(&self.store, TemplateId::KafkaMockBody, &context)?;

        let unit = JavaUnit::new(args.base_package, args.class_name, SourceKind::Test)
            .imports([
                "org.junit.jupiter.api.*",
                "org.assertj.core.api.Assertions",
                "org.apache.kafka.clients.producer.*",
            ])
            .javadoc("Auto-generated Kafka mock producer test.")
            .body(body);
        Ok(unit.emit(&args.base_dir)?.into())
    }
}

fn default_client_id() -> String {
    "qa-testkit".to_string()
}

fn default_consumer_group() -> String {
    "qa-testkit-group".to_string()
}

fn default_acks() -> String {
    "all".to_string()
}

fn default_auto_offset_reset() -> String {
    "earliest".to_string()
}

fn default_bootstrap_servers() -> String {
    "localhost:9092".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct KafkaScaffoldArgs {
    /// Root Java package; classes go to `<base_package>.messaging.kafka`
    pub base_package: String,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_consumer_group")]
    pub consumer_group: String,
    #[serde(default = "default_acks")]
    pub acks: String,
    #[serde(default = "default_auto_offset_reset")]
    pub auto_offset_reset: String,
    #[serde(default = "default_bootstrap_servers")]
    pub bootstrap_servers: String,
}

impl KafkaScaffoldArgs {
    fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("topic", &escape_java_string(&self.topic));
        context.insert("client_id", &escape_java_string(&self.client_id));
        context.insert("consumer_group", &escape_java_string(&self.consumer_group));
        context.insert("acks", &escape_java_string(&self.acks));
        context.insert(
            "auto_offset_reset",
            &escape_java_string(&self.auto_offset_reset),
        );
        context.insert(
            "bootstrap_servers",
            &escape_java_string(&self.bootstrap_servers),
        );
        context
    }
}

/// The generated classes, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KafkaPart {
    Config,
    ProducerClient,
    ConsumerClient,
    ProducerTest,
    ConsumerTest,
}

impl KafkaPart {
    pub const ALL: [KafkaPart; 5] = [
        KafkaPart::Config,
        KafkaPart::ProducerClient,
        KafkaPart::ConsumerClient,
        KafkaPart::ProducerTest,
        KafkaPart::ConsumerTest,
    ];

    fn unit(self, package: &str, context: &Context) -> crate::Result<JavaUnit> {
        let unit = match self {
            KafkaPart::Config => JavaUnit::new(package, "KafkaConfig", SourceKind::Main)
                .imports([
                    "java.util.Properties",
                    "org.apache.kafka.common.serialization.StringDeserializer",
                    "org.apache.kafka.common.serialization.StringSerializer",
                ])
                .javadoc("Auto-generated Kafka configuration.")
                .body(render_template("KafkaConfig", KAFKA_CONFIG_BODY, context)?),
            KafkaPart::ProducerClient => {
                JavaUnit::new(package, "KafkaProducerClient", SourceKind::Main)
                    .imports([
                        "java.util.Properties",
                        "org.apache.kafka.clients.producer.KafkaProducer",
                        "org.apache.kafka.clients.producer.ProducerRecord",
                    ])
                    .javadoc("Auto-generated Kafka producer client.")
                    .implements("AutoCloseable")
                    .body(PRODUCER_CLIENT_BODY)
            }
            KafkaPart::ConsumerClient => {
                JavaUnit::new(package, "KafkaConsumerClient", SourceKind::Main)
                    .imports([
                        "java.time.Duration",
                        "java.util.Collections",
                        "java.util.Properties",
                        "org.apache.kafka.clients.consumer.ConsumerRecords",
                        "org.apache.kafka.clients.consumer.KafkaConsumer",
                    ])
                    .javadoc("Auto-generated Kafka consumer client.")
                    .implements("AutoCloseable")
                    .body(CONSUMER_CLIENT_BODY)
            }
            KafkaPart::ProducerTest => JavaUnit::new(package, "KafkaProducerTest", SourceKind::Test)
                .imports([
                    "org.junit.jupiter.api.*",
                    "org.assertj.core.api.Assertions",
                    "org.apache.kafka.clients.producer.*",
                    "org.apache.kafka.common.serialization.StringSerializer",
                ])
                .javadoc("Auto-generated unit test for Kafka producer using MockProducer.")
                .body(render_template("KafkaProducerTest", PRODUCER_TEST_BODY, context)?),
            KafkaPart::ConsumerTest => JavaUnit::new(package, "KafkaConsumerTest", SourceKind::Test)
                .imports([
                    "java.util.*",
                    "java.time.Duration",
                    "org.junit.jupiter.api.*",
                    "org.assertj.core.api.Assertions",
                    "org.apache.kafka.common.TopicPartition",
                    "org.apache.kafka.clients.consumer.*",
                ])
                .javadoc("Auto-generated unit test for Kafka consumer using MockConsumer.")
                .body(render_template("KafkaConsumerTest", CONSUMER_TEST_BODY, context)?),
        };
        Ok(unit)
    }
}

/// Config, producer and consumer clients, and their MockProducer/MockConsumer tests.
pub struct KafkaMessagingScaffoldTool;

impl KafkaMessagingScaffoldTool {
    fn package(args: &KafkaScaffoldArgs) -> String {
        format!("{}.messaging.kafka", args.base_package.trim())
    }

    /// The five units in emission order.
    pub fn units(args: &KafkaScaffoldArgs) -> crate::Result<Vec<JavaUnit>> {
        let package = Self::package(args);
        let context = args.context();
        KafkaPart::ALL
            .iter()
            .map(|part| part.unit(&package, &context))
            .collect()
    }
}

impl Generator for KafkaMessagingScaffoldTool {
    type Args = KafkaScaffoldArgs;
    const NAME: &'static str = "KafkaMessagingScaffoldTool";
    const DESCRIPTION: &'static str =
        "Generates Kafka config, producer, consumer, and unit tests.";

    fn run(&self, args: KafkaScaffoldArgs) -> crate::Result<Report> {
        let package = Self::package(&args);
        let context = args.context();
        let mut report = Report::new();
        for part in KafkaPart::ALL {
            report.push(part.unit(&package, &context)?.emit(&args.base_dir)?);
        }
        Ok(report)
    }
}
