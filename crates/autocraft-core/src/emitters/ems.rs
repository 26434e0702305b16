//! JMS / TIBCO EMS messaging scaffold under `<base_package>.messaging.ems`.
//!
//! Config and client bodies are built in; the two Mockito tests come from the
//! template store.

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

const EMS_CONFIG_BODY: &str = r#"public static final String QUEUE_NAME = "{{ queue_name }}";
public static final String PROVIDER_URL = "{{ provider_url }}";
public static final String FACTORY_JNDI = "{{ factory_jndi }}";

private EmsConfig() {}

public static ConnectionFactory jndiConnectionFactory() throws Exception {
    return jndiConnectionFactory(PROVIDER_URL, FACTORY_JNDI);
}

public static ConnectionFactory jndiConnectionFactory(String providerUrl, String factoryJndi) throws Exception {
    Hashtable<String, String> env = new Hashtable<>();
    env.put(Context.INITIAL_CONTEXT_FACTORY, "{{ jndi_initial_ctx }}");
    env.put(Context.PROVIDER_URL, providerUrl);
    Context ctx = new InitialContext(env);
    return (ConnectionFactory) ctx.lookup(factoryJndi);
}

public static ConnectionFactory directConnectionFactory(String serverUrl) throws Exception {
    return (ConnectionFactory) Class
        .forName("com.tibco.tibjms.TibjmsConnectionFactory")
        .getConstructor(String.class)
        .newInstance(serverUrl);
}"#;

const EMS_PRODUCER_BODY: &str = r#"private final Connection connection;
private final Session session;
private final MessageProducer producer;

public EmsProducer(ConnectionFactory cf, String queueName, String user, String pass) throws JMSException {
    this.connection = (user != null) ? cf.createConnection(user, pass) : cf.createConnection();
    this.connection.start();
    this.session = connection.createSession(false, Session.AUTO_ACKNOWLEDGE);
    Queue q = session.createQueue(queueName);
    this.producer = session.createProducer(q);
}

public void sendText(String text) throws JMSException {
    TextMessage msg = session.createTextMessage(text);
    producer.send(msg);
}

@Override
public void close() throws JMSException {
    try {
        producer.close();
    } finally {
        try {
            session.close();
        } finally {
            connection.close();
        }
    }
}"#;

const EMS_CONSUMER_BODY: &str = r#"private final Connection connection;
private final Session session;
private final MessageConsumer consumer;

public EmsConsumer(ConnectionFactory cf, String queueName, String user, String pass) throws JMSException {
    this.connection = (user != null) ? cf.createConnection(user, pass) : cf.createConnection();
    this.connection.start();
    this.session = connection.createSession(false, Session.AUTO_ACKNOWLEDGE);
    Queue q = session.createQueue(queueName);
    this.consumer = session.createConsumer(q);
}

public String receiveText(long timeoutMillis) throws JMSException {
    Message m = consumer.receive(timeoutMillis);
    if (m == null) {
        return null;
    }
    if (m instanceof TextMessage) {
        return ((TextMessage) m).getText();
    }
    throw new MessageFormatException("Expected TextMessage");
}

@Override
public void close() throws JMSException {
    try {
        consumer.close();
    } finally {
        try {
            session.close();
        } finally {
            connection.close();
        }
    }
}"#;

fn default_queue_name() -> String {
    "demo.queue".to_string()
}

fn default_jndi_initial_ctx() -> String {
    "com.tibco.tibjms.naming.TibjmsInitialContextFactory".to_string()
}

fn default_provider_url() -> String {
    "tibjmsnaming://localhost:7222".to_string()
}

fn default_factory_jndi() -> String {
    "QueueConnectionFactory".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EmsScaffoldArgs {
    /// Root Java package; classes go to `<base_package>.messaging.ems`
    pub base_package: String,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
    /// JNDI initial context factory class
    #[serde(default = "default_jndi_initial_ctx")]
    pub jndi_initial_ctx: String,
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// JNDI name of the connection factory
    #[serde(default = "default_factory_jndi")]
    pub factory_jndi: String,
}

impl EmsScaffoldArgs {
    fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("queue_name", &escape_java_string(&self.queue_name));
        context.insert(
            "jndi_initial_ctx",
            &escape_java_string(&self.jndi_initial_ctx),
        );
        context.insert("provider_url", &escape_java_string(&self.provider_url));
        context.insert("factory_jndi", &escape_java_string(&self.factory_jndi));
        context
    }
}

/// The generated classes, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmsPart {
    Config,
    Producer,
    Consumer,
    ProducerTest,
    ConsumerTest,
}

impl EmsPart {
    pub const ALL: [EmsPart; 5] = [
        EmsPart::Config,
        EmsPart::Producer,
        EmsPart::Consumer,
        EmsPart::ProducerTest,
        EmsPart::ConsumerTest,
    ];
}

pub struct EmsMessagingScaffoldTool {
    store: Arc<TemplateStore>,
}

impl EmsMessagingScaffoldTool {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }

    /// Render one class of the scaffold.
    pub fn unit(
        &self,
        part: EmsPart,
        package: &str,
        context: &Context,
    ) -> crate::Result<JavaUnit> {
        let unit = match part {
            EmsPart::Config => JavaUnit::new(package, "EmsConfig", SourceKind::Main)
                .imports(["javax.jms.*", "javax.naming.*", "java.util.Hashtable"])
                .javadoc("Auto-generated EMS/JMS configuration helpers (JNDI/direct).")
                .body(render_template("EmsConfig", EMS_CONFIG_BODY, context)?),
            EmsPart::Producer => JavaUnit::new(package, "EmsProducer", SourceKind::Main)
                .imports(["javax.jms.*"])
                .javadoc("Auto-generated EMS producer wrapper.")
                .implements("AutoCloseable")
                .body(EMS_PRODUCER_BODY),
            EmsPart::Consumer => JavaUnit::new(package, "EmsConsumer", SourceKind::Main)
                .imports(["javax.jms.*"])
                .javadoc("Auto-generated EMS consumer wrapper.")
                .implements("AutoCloseable")
                .body(EMS_CONSUMER_BODY),
            EmsPart::ProducerTest => JavaUnit::new(package, "EmsProducerTest", SourceKind::Test)
                .imports([
                    "org.junit.jupiter.api.*",
                    "org.mockito.Mockito",
                    "javax.jms.*",
                ])
                .javadoc("Auto-generated Mockito unit test for EMS producer.")
                .body(render_body(&self.store, TemplateId::ProducerTestBody, context)?),
            EmsPart::ConsumerTest => JavaUnit::new(package, "EmsConsumerTest", SourceKind::Test)
                .imports([
                    "org.junit.jupiter.api.*",
                    "org.assertj.core.api.Assertions",
                    "org.mockito.Mockito",
                    "javax.jms.*",
                ])
                .javadoc("Auto-generated Mockito unit test for EMS consumer.")
                .body(render_body(&self.store, TemplateId::ConsumerTestBody, context)?),
        };
        Ok(unit)
    }

    /// Config, producer, consumer, producer test, consumer test.
    pub fn units(&self, args: &EmsScaffoldArgs) -> crate::Result<Vec<JavaUnit>> {
        let package = package_of(args);
        let context = args.context();
        EmsPart::ALL
            .iter()
            .map(|part| self.unit(*part, &package, &context))
            .collect()
    }
}

fn package_of(args: &EmsScaffoldArgs) -> String {
    format!("{}.messaging.ems", args.base_package.trim())
}

impl Generator for EmsMessagingScaffoldTool {
    type Args = EmsScaffoldArgs;
    const NAME: &'static str = "EmsMessagingScaffoldTool";
    const DESCRIPTION: &'static str =
        "Generates JMS/EMS config, producer, consumer, and Mockito-based unit tests.";

    // Each class is written before the next is rendered; a failure leaves
    // the earlier files in place.
    fn run(&self, args: EmsScaffoldArgs) -> crate::Result<Report> {
        let package = package_of(&args);
        let context = args.context();
        let mut report = Report::new();
        for part in EmsPart::ALL {
            let unit = self.unit(part, &package, &context)?;
            report.push(unit.emit(&args.base_dir)?);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Tool, ToolAdapter};
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn tool() -> EmsMessagingScaffoldTool {
        let store = TemplateStore::empty()
            .with_template(
                TemplateId::ProducerTestBody,
                "@Test\nvoid sends() { String q = \"{{ queue_name }}\"; }",
            )
            .with_template(TemplateId::ConsumerTestBody, "@Test\nvoid receives() {}");
        EmsMessagingScaffoldTool::new(Arc::new(store))
    }

    #[test]
    fn test_emits_units_under_ems_package() -> crate::Result<()> {
        let dir = tempdir()?;
        let out = ToolAdapter::new(tool())
            .invoke(&json!({"base_package": "com.acme", "base_dir": dir.path()}))?;
        assert_eq!(out.lines().count(), 5);

        let main = dir.path().join("src/main/java/com/acme/messaging/ems");
        let test = dir.path().join("src/test/java/com/acme/messaging/ems");
        for name in ["EmsConfig", "EmsProducer", "EmsConsumer"] {
            assert!(main.join(format!("{name}.java")).is_file(), "{name}");
        }
        let producer_test = fs::read_to_string(test.join("EmsProducerTest.java"))?;
        assert!(producer_test.contains("String q = \"demo.queue\";"));
        assert!(test.join("EmsConsumerTest.java").is_file());

        let config = fs::read_to_string(main.join("EmsConfig.java"))?;
        assert!(config.contains("com.tibco.tibjms.naming.TibjmsInitialContextFactory"));
        assert!(config.contains("PROVIDER_URL = \"tibjmsnaming://localhost:7222\";"));
        assert_eq!(config.matches("class EmsConfig").count(), 1);
        Ok(())
    }

    #[test]
    fn test_clients_are_closeable() -> crate::Result<()> {
        let args: EmsScaffoldArgs = serde_json::from_value(json!({"base_package": "a.b"}))?;
        let units = tool().units(&args)?;
        assert!(units[1].render().contains("public class EmsProducer implements AutoCloseable {"));
        assert!(units[2].render().contains("public class EmsConsumer implements AutoCloseable {"));
        assert_eq!(units[3].kind, SourceKind::Test);
        Ok(())
    }

    #[test]
    fn test_render_failure_keeps_earlier_files() -> crate::Result<()> {
        let dir = tempdir()?;
        let store = TemplateStore::empty()
            .with_template(TemplateId::ProducerTestBody, "{{ nope }}")
            .with_template(TemplateId::ConsumerTestBody, "@Test\nvoid receives() {}");
        let tool = ToolAdapter::new(EmsMessagingScaffoldTool::new(Arc::new(store)));

        let result = tool.invoke(&json!({"base_package": "com.acme", "base_dir": dir.path()}));
        assert!(matches!(result, Err(crate::Error::Tera(_))));

        let main = dir.path().join("src/main/java/com/acme/messaging/ems");
        for name in ["EmsConfig", "EmsProducer", "EmsConsumer"] {
            assert!(main.join(format!("{name}.java")).is_file(), "{name}");
        }
        let test = dir.path().join("src/test/java/com/acme/messaging/ems");
        assert!(!test.join("EmsProducerTest.java").exists());
        assert!(!test.join("EmsConsumerTest.java").exists());
        Ok(())
    }
}
