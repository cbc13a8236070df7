use std::collections::BTreeMap;
use std::io;
use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};

pub type Labels = BTreeMap<String, String>;

/// Serializes a manifest to the document written to disk: a generated-at
/// comment line followed by the YAML body.
pub fn render<T: Serialize>(manifest: &T) -> io::Result<String> {
    let body = serde_yaml::to_string(manifest)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(format!(
        "# Generated by kubegen at {}\n{}",
        Local::now().to_rfc3339(),
        body
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Metadata {
    pub fn named(name: &str) -> Self {
        Metadata {
            name: name.to_string(),
            labels: None,
            annotations: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    pub replicas: u32,
    pub template: PodTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplate {
    pub metadata: TemplateMetadata,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub labels: Labels,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    pub containers: Vec<Container>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Volume>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<String>,
}

impl Deployment {
    pub fn new(name: &str, replicas: u32, labels: Labels) -> Self {
        Deployment {
            api_version: "extensions/v1beta1".to_string(),
            kind: "Deployment".to_string(),
            metadata: Metadata::named(name),
            spec: DeploymentSpec {
                replicas,
                template: PodTemplate {
                    metadata: TemplateMetadata { labels },
                    spec: PodSpec {
                        containers: Vec::new(),
                        volumes: None,
                        restart_policy: None,
                    },
                },
            },
        }
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.spec.template.spec.containers.push(container);
        self
    }

    pub fn with_volumes(mut self, volumes: Vec<Volume>) -> Self {
        self.spec.template.spec.volumes = Some(volumes);
        self
    }

    pub fn with_restart_policy(mut self, policy: &str) -> Self {
        self.spec.template.spec.restart_policy = Some(policy.to_string());
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}_deploy.yaml", self.metadata.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    pub ports: Vec<ContainerPort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<EnvVar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_mounts: Option<Vec<VolumeMount>>,
}

impl Container {
    pub fn new(name: &str, image: &str, ports: Vec<ContainerPort>) -> Self {
        Container {
            name: name.to_string(),
            image: image.to_string(),
            ports,
            env: None,
            volume_mounts: None,
        }
    }

    pub fn with_env(mut self, env: Vec<EnvVar>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_volume_mounts(mut self, mounts: Vec<VolumeMount>) -> Self {
        self.volume_mounts = Some(mounts);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    pub container_port: u16,
    pub protocol: String,
}

impl ContainerPort {
    pub fn tcp(port: u16) -> Self {
        ContainerPort {
            container_port: port,
            protocol: "TCP".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    pub host_path: HostPath,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostPath {
    pub path: String,
    #[serde(rename = "type")]
    pub path_type: HostPathType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HostPathType {
    DirectoryOrCreate,
    Directory,
    FileOrCreate,
    File,
    Socket,
    CharDevice,
    BlockDevice,
}

impl HostPathType {
    pub const ALL: [HostPathType; 7] = [
        HostPathType::DirectoryOrCreate,
        HostPathType::Directory,
        HostPathType::FileOrCreate,
        HostPathType::File,
        HostPathType::Socket,
        HostPathType::CharDevice,
        HostPathType::BlockDevice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostPathType::DirectoryOrCreate => "DirectoryOrCreate",
            HostPathType::Directory => "Directory",
            HostPathType::FileOrCreate => "FileOrCreate",
            HostPathType::File => "File",
            HostPathType::Socket => "Socket",
            HostPathType::CharDevice => "CharDevice",
            HostPathType::BlockDevice => "BlockDevice",
        }
    }
}

impl FromStr for HostPathType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown host path type: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: ServiceSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    pub ports: Vec<ServicePort>,
    pub selector: Labels,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub port: u16,
    pub target_port: u16,
    pub protocol: String,
    pub name: String,
}

impl ServicePort {
    pub fn http(port: u16, target_port: u16) -> Self {
        ServicePort {
            port,
            target_port,
            protocol: "TCP".to_string(),
            name: "http".to_string(),
        }
    }
}

impl Service {
    pub fn new(name: &str) -> Self {
        Service {
            api_version: "v1".to_string(),
            kind: "Service".to_string(),
            metadata: Metadata::named(name),
            spec: ServiceSpec {
                ports: Vec::new(),
                selector: Labels::new(),
            },
        }
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.metadata.labels = Some(labels);
        self
    }

    pub fn with_ports(mut self, ports: Vec<ServicePort>) -> Self {
        self.spec.ports = ports;
        self
    }

    pub fn with_selector(mut self, selector: Labels) -> Self {
        self.spec.selector = selector;
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}_service.yaml", self.metadata.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingress {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: IngressSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    pub rules: Vec<IngressRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    pub host: String,
    pub http: HttpIngressRule,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpIngressRule {
    pub paths: Vec<HttpIngressPath>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpIngressPath {
    pub path: String,
    pub backend: IngressBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressBackend {
    pub service_name: String,
    pub service_port: u16,
}

impl Ingress {
    pub fn new(name: &str) -> Self {
        let mut annotations = BTreeMap::new();
        annotations.insert(
            "kubernetes.io/ingress.class".to_string(),
            "nginx".to_string(),
        );
        annotations.insert(
            "nginx.ingress.kubernetes.io/ssl-redirect".to_string(),
            "false".to_string(),
        );
        Ingress {
            api_version: "extensions/v1beta1".to_string(),
            kind: "Ingress".to_string(),
            metadata: Metadata {
                name: name.to_string(),
                labels: None,
                annotations: Some(annotations),
            },
            spec: IngressSpec { rules: Vec::new() },
        }
    }

    pub fn with_rule(mut self, rule: IngressRule) -> Self {
        self.spec.rules.push(rule);
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}_ingress.yaml", self.metadata.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_deployment() -> Deployment {
        Deployment::new("web", 3, labels(&[("app", "web")]))
            .with_container(Container::new(
                "nginx",
                "nginx:latest",
                vec![ContainerPort::tcp(80)],
            ))
            .with_restart_policy("Always")
    }

    #[test]
    fn deployment_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample_deployment()).unwrap();
        assert_eq!(
            value,
            json!({
                "apiVersion": "extensions/v1beta1",
                "kind": "Deployment",
                "metadata": {"name": "web"},
                "spec": {
                    "replicas": 3,
                    "template": {
                        "metadata": {"labels": {"app": "web"}},
                        "spec": {
                            "containers": [{
                                "name": "nginx",
                                "image": "nginx:latest",
                                "ports": [{"containerPort": 80, "protocol": "TCP"}]
                            }],
                            "restartPolicy": "Always"
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn optional_container_blocks_are_omitted_until_set() {
        let container = Container::new("nginx", "nginx:latest", vec![ContainerPort::tcp(80)]);
        let value = serde_json::to_value(&container).unwrap();
        assert!(value.get("env").is_none());
        assert!(value.get("volumeMounts").is_none());

        let container = container
            .with_env(vec![EnvVar {
                name: "MODE".to_string(),
                value: "prod".to_string(),
            }])
            .with_volume_mounts(vec![VolumeMount {
                name: "data".to_string(),
                mount_path: "/data".to_string(),
            }]);
        let value = serde_json::to_value(&container).unwrap();
        assert_eq!(value["env"], json!([{"name": "MODE", "value": "prod"}]));
        assert_eq!(
            value["volumeMounts"],
            json!([{"name": "data", "mountPath": "/data"}])
        );
    }

    #[test]
    fn volumes_serialize_with_host_path_type() {
        let volume = Volume {
            name: "data".to_string(),
            host_path: HostPath {
                path: "/data".to_string(),
                path_type: HostPathType::Directory,
            },
        };
        let value = serde_json::to_value(&volume).unwrap();
        assert_eq!(
            value,
            json!({"name": "data", "hostPath": {"path": "/data", "type": "Directory"}})
        );
    }

    #[test]
    fn host_path_type_parses_known_variants_only() {
        for path_type in HostPathType::ALL {
            assert_eq!(path_type.as_str().parse::<HostPathType>(), Ok(path_type));
        }
        assert!("directory".parse::<HostPathType>().is_err());
        assert!("Pipe".parse::<HostPathType>().is_err());
    }

    #[test]
    fn service_port_entries_are_named_http() {
        let value = serde_json::to_value(ServicePort::http(80, 8080)).unwrap();
        assert_eq!(
            value,
            json!({"port": 80, "targetPort": 8080, "protocol": "TCP", "name": "http"})
        );
    }

    #[test]
    fn ingress_carries_fixed_nginx_annotations() {
        let ingress = Ingress::new("web");
        let annotations = ingress.metadata.annotations.as_ref().unwrap();
        assert_eq!(
            annotations.get("kubernetes.io/ingress.class"),
            Some(&"nginx".to_string())
        );
        assert_eq!(
            annotations.get("nginx.ingress.kubernetes.io/ssl-redirect"),
            Some(&"false".to_string())
        );
    }

    #[test]
    fn file_names_follow_the_resource_name() {
        assert_eq!(sample_deployment().file_name(), "web_deploy.yaml");
        assert_eq!(Service::new("web").file_name(), "web_service.yaml");
        assert_eq!(Ingress::new("web").file_name(), "web_ingress.yaml");
    }

    #[test]
    fn render_prefixes_a_comment_header_over_valid_yaml() {
        let document = render(&sample_deployment()).unwrap();
        assert!(document.starts_with("# Generated by kubegen at "));
        let value: serde_yaml::Value = serde_yaml::from_str(&document).unwrap();
        assert_eq!(value["kind"].as_str(), Some("Deployment"));
        assert_eq!(value["spec"]["replicas"].as_u64(), Some(3));
    }
}
