use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use serde::Serialize;

use crate::gradient::GradientText;
use crate::manifest::{
    render, Container, ContainerPort, Deployment, EnvVar, HostPath, HostPathType, HttpIngressPath,
    HttpIngressRule, Ingress, IngressBackend, IngressRule, Labels, Service, ServicePort, Volume,
    VolumeMount,
};
use crate::prompt::{digits, not_empty, split_tokens, Prompter};

/// Runs the question flow for the requested kind and writes the manifest to
/// the current directory. Fatal answers surface as errors; the caller decides
/// the exit code.
pub fn generate(kind: &str) -> io::Result<()> {
    println!();
    println!(
        "{}",
        GradientText::banner(&format!("  Begin {} workflow ......", kind))
    );

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock());

    match kind {
        "deployment" => match collect_deployment(&mut prompter)? {
            Some(deploy) => finish(&deploy.file_name(), &deploy, "deployment"),
            // reported label mismatch, deployment step skipped
            None => Ok(()),
        },
        "service" => {
            let service = collect_service(&mut prompter)?;
            finish(&service.file_name(), &service, "service")
        }
        "ingress" => {
            let ingress = collect_ingress(&mut prompter)?;
            finish(&ingress.file_name(), &ingress, "ingress")
        }
        other => Err(invalid(format!("unsupported kind: {}", other))),
    }
}

fn finish<T: Serialize>(file_name: &str, manifest: &T, kind: &str) -> io::Result<()> {
    println!(
        "{}",
        GradientText::banner("  Begin generate yaml file ......")
    );
    write_manifest(Path::new(file_name), &render(manifest)?)?;
    println!("{}", GradientText::banner("  Generate yaml file success!"));
    println!();
    println!(
        "{}",
        GradientText::hint("  You can copy yaml to remote host: ")
    );
    println!(
        "{}",
        GradientText::command(&format!("    scp {} remote_ip:{}", file_name, file_name))
    );
    println!("{}", GradientText::hint(&format!("  And create {}: ", kind)));
    println!(
        "{}",
        GradientText::command(&format!("    kubectl create -f {}", file_name))
    );
    println!();
    Ok(())
}

/// Whole-file write, overwriting any previous manifest of the same name.
pub fn write_manifest(path: &Path, document: &str) -> io::Result<()> {
    fs::write(path, document)
}

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message.into())
}

fn answered_yes(answer: &str) -> bool {
    split_tokens(answer).first().map(|t| t == "yes").unwrap_or(false)
}

/// Parses every token of a port answer, failing the run on the first
/// non-numeric entry.
fn parse_ports(answer: &str, message: &'static str) -> io::Result<Vec<u16>> {
    split_tokens(answer)
        .iter()
        .map(|token| token.parse::<u16>().map_err(|_| invalid(message)))
        .collect()
}

fn zip_labels(keys: Vec<String>, values: Vec<String>) -> Labels {
    keys.into_iter().zip(values).collect()
}

pub fn collect_deployment<R: BufRead>(
    prompter: &mut Prompter<R>,
) -> io::Result<Option<Deployment>> {
    let name = prompter.ask("? Please enter the name of deployment: ", not_empty)?;
    let replicas = prompter
        .ask("? Please enter the number of replica: ", digits)?
        .parse::<u32>()
        .map_err(|_| invalid("The number of replica is out of range, please try again."))?;

    println!(
        "{}",
        GradientText::section(
            "? Please enter the labels, this is useful for service (if more than one, use space, like 'A B'): "
        )
    );
    let label_keys = split_tokens(&prompter.ask("  ? Name of labels: ", not_empty)?);
    let label_values = split_tokens(&prompter.ask("  ? Value of labels: ", not_empty)?);
    if label_keys.len() != label_values.len() {
        println!(
            "{}",
            GradientText::error(
                "! The key's number of labels not equal to value's number, please try again."
            )
        );
        return Ok(None);
    }
    let mut deploy = Deployment::new(&name, replicas, zip_labels(label_keys, label_values));

    println!(
        "{}",
        GradientText::section(
            "? Please enter the containers information (if more than one, use space): "
        )
    );
    let container_name = prompter.ask("  ? Name of container: ", not_empty)?;
    let container_image = prompter.ask("  ? Image of container: ", not_empty)?;
    let port_answer = prompter.ask("  ? Port of container: ", not_empty)?;
    let ports = parse_ports(&port_answer, "The port is not digit, please try again.")?;
    let mut container = Container::new(
        &container_name,
        &container_image,
        ports.into_iter().map(ContainerPort::tcp).collect(),
    );

    let env_answer = prompter.ask_free("  ? Env of container[yes|no]: ")?;
    if answered_yes(&env_answer) {
        let env_names = split_tokens(&prompter.ask("    ? Name of env: ", not_empty)?);
        let env_values = split_tokens(&prompter.ask("    ? Value of env: ", not_empty)?);
        if env_names.len() != env_values.len() {
            return Err(invalid(
                "The name's number of container's env not equal to value's number, please try again.",
            ));
        }
        container = container.with_env(
            env_names
                .into_iter()
                .zip(env_values)
                .map(|(name, value)| EnvVar { name, value })
                .collect(),
        );
    }

    let volume_answer = prompter.ask_free("  ? Volume of container[yes|no]: ")?;
    if answered_yes(&volume_answer) {
        let volume_names = split_tokens(&prompter.ask("    ? Name of volume: ", not_empty)?);
        let volume_paths = split_tokens(&prompter.ask("    ? Path of volume: ", not_empty)?);
        if volume_names.len() != volume_paths.len() {
            return Err(invalid(
                "The name's number of container's volume not equal to path's number, please try again.",
            ));
        }
        container = container.with_volume_mounts(
            volume_names
                .iter()
                .zip(&volume_paths)
                .map(|(name, path)| VolumeMount {
                    name: name.clone(),
                    mount_path: path.clone(),
                })
                .collect(),
        );

        let path_type = ask_host_path_type(prompter)?;
        deploy = deploy.with_volumes(
            volume_names
                .into_iter()
                .zip(volume_paths)
                .map(|(name, path)| Volume {
                    name,
                    host_path: HostPath { path, path_type },
                })
                .collect(),
        );
    }
    deploy = deploy.with_container(container);

    let restart = prompter.ask("? Restart policy[yes|no]: ", not_empty)?;
    if restart == "yes" {
        deploy = deploy.with_restart_policy("Always");
    }

    Ok(Some(deploy))
}

fn ask_host_path_type<R: BufRead>(prompter: &mut Prompter<R>) -> io::Result<HostPathType> {
    let allowed = HostPathType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{}",
        GradientText::hint(&format!("    Allowed types: {}", allowed))
    );
    loop {
        let answer = prompter.ask("    ? Type of volume on host: ", not_empty)?;
        match answer.trim().parse::<HostPathType>() {
            Ok(path_type) => return Ok(path_type),
            Err(_) => println!(
                "{}",
                GradientText::error(&format!("! Unknown volume type, expected one of: {}", allowed))
            ),
        }
    }
}

pub fn collect_service<R: BufRead>(prompter: &mut Prompter<R>) -> io::Result<Service> {
    let name = prompter.ask("? Please enter the name of service: ", not_empty)?;
    let mut service = Service::new(&name);

    let labels_answer = prompter.ask_free("? Labels of service[yes|no]: ")?;
    if answered_yes(&labels_answer) {
        let label_keys = split_tokens(&prompter.ask("  ? Name of labels: ", not_empty)?);
        let label_values = split_tokens(&prompter.ask("  ? Value of labels: ", not_empty)?);
        if label_keys.len() != label_values.len() {
            return Err(invalid(
                "The key's number of labels not equal to value's number, please try again.",
            ));
        }
        service = service.with_labels(zip_labels(label_keys, label_values));
    }

    println!(
        "{}",
        GradientText::section(
            "? Please enter the port information (if more than one, use space): "
        )
    );
    let service_port_answer = prompter.ask("  ? Port of service: ", not_empty)?;
    let container_port_answer = prompter.ask("  ? Port of container: ", not_empty)?;
    if split_tokens(&service_port_answer).len() != split_tokens(&container_port_answer).len() {
        return Err(invalid(
            "The port's number of service not equal to container, please try again.",
        ));
    }
    let service_ports = parse_ports(
        &service_port_answer,
        "The type of port is not int, please try again.",
    )?;
    let container_ports = parse_ports(
        &container_port_answer,
        "The type of port is not int, please try again.",
    )?;
    service = service.with_ports(
        service_ports
            .into_iter()
            .zip(container_ports)
            .map(|(port, target)| ServicePort::http(port, target))
            .collect(),
    );

    println!(
        "{}",
        GradientText::section(
            "? Please enter the labels information of deployment (if more than one, use space): "
        )
    );
    let selector_keys = split_tokens(&prompter.ask("  ? Name of labels: ", not_empty)?);
    let selector_values = split_tokens(&prompter.ask("  ? Value of labels: ", not_empty)?);
    if selector_keys.len() != selector_values.len() {
        return Err(invalid(
            "The key's number of labels not equal to value's number, please try again.",
        ));
    }
    service = service.with_selector(zip_labels(selector_keys, selector_values));

    Ok(service)
}

pub fn collect_ingress<R: BufRead>(prompter: &mut Prompter<R>) -> io::Result<Ingress> {
    let name = prompter.ask("? Please enter the name of ingress: ", not_empty)?;
    let mut ingress = Ingress::new(&name);

    println!(
        "{}",
        GradientText::section("? Please enter the rules information: ")
    );
    let hosts = split_tokens(&prompter.ask(
        "  ? Host of rule (if more than one, use space): ",
        not_empty,
    )?);
    for (rule_index, host) in hosts.into_iter().enumerate() {
        println!(
            "{}",
            GradientText::progress(&format!("    Begin {}th rule: ", rule_index + 1))
        );
        let paths = split_tokens(&prompter.ask(
            "    ? Path of rule (if more than one, use space): ",
            not_empty,
        )?);
        let mut rule_paths = Vec::new();
        for (path_index, path) in paths.into_iter().enumerate() {
            println!(
                "{}",
                GradientText::progress(&format!("      Begin {}th path: ", path_index + 1))
            );
            let service_name = prompter.ask("      ? Service name: ", not_empty)?;
            let service_port = prompter
                .ask("      ? Service port: ", digits)?
                .parse::<u16>()
                .map_err(|_| invalid("The service port is out of range, please try again."))?;
            rule_paths.push(HttpIngressPath {
                path,
                backend: IngressBackend {
                    service_name,
                    service_port,
                },
            });
        }
        ingress = ingress.with_rule(IngressRule {
            host,
            http: HttpIngressRule { paths: rule_paths },
        });
    }

    Ok(ingress)
}
