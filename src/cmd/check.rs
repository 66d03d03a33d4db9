use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use dapc::policy::factory::PolicyFactory;
use dapc::policy::Policy;
use dapc::types::identity::Identity;
use dapc::types::method::Method;
use dapc::types::request::Request;

use super::init_config;

/// Check one request against the configured policy
#[derive(Args)]
pub struct CheckArgs {
    /// The config file to use, defaults to `dapc.toml` in the current directory
    #[clap(short, long)]
    pub config: Option<String>,

    /// The view the request is sent to
    #[clap(long, default_value = "")]
    pub view: String,

    /// The request method
    #[clap(short, long, default_value = "GET")]
    pub method: String,

    /// Authenticated user name, the request is anonymous when omitted
    #[clap(short, long)]
    pub user: Option<String>,

    /// Give the user the staff flag
    #[clap(long)]
    pub staff: bool,

    /// Give the user the superuser flag
    #[clap(long)]
    pub superuser: bool,

    /// Send the request without any identity, as if authentication never ran
    #[clap(long)]
    pub no_identity: bool,

    /// Request header as `KEY=VALUE`, can be repeated
    #[clap(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Run the object level check instead of the view level one
    #[clap(long)]
    pub object: bool,
}

impl CheckArgs {
    pub fn run(&self) -> Result<ExitCode> {
        let cfg = init_config(self.config.as_deref())?;

        let policy = PolicyFactory::new()
            .build_policy(&cfg.policy)
            .context("build policy")?;
        let request = self.build_request()?;
        let view = cfg.view(&self.view);

        let result = if self.object {
            policy.has_object_permission(&request, &view, &())
        } else {
            policy.has_permission(&request, &view)
        };
        let allowed = result.context("check permission")?;

        let level = if self.object { "object" } else { "view" };
        if allowed {
            println!("{} ({level} level): {}", request.method, style("allowed").green());
            Ok(ExitCode::SUCCESS)
        } else {
            println!("{} ({level} level): {}", request.method, style("denied").red());
            Ok(ExitCode::FAILURE)
        }
    }

    fn build_request(&self) -> Result<Request> {
        let method: Method = self.method.parse()?;
        let mut request = Request::new(method);

        if !self.no_identity {
            let user = match self.user.as_ref() {
                Some(name) => Identity::authenticated(name.as_str())
                    .with_staff(self.staff)
                    .with_superuser(self.superuser),
                None => {
                    if self.staff || self.superuser {
                        bail!("--staff and --superuser require --user");
                    }
                    Identity::anonymous()
                }
            };
            request = request.with_user(user);
        }

        for header in self.headers.iter() {
            let (key, value) = match header.split_once('=') {
                Some((key, value)) => (key.trim(), value),
                None => bail!("invalid header '{header}', expect KEY=VALUE"),
            };
            if key.is_empty() {
                bail!("invalid header '{header}', key cannot be empty");
            }
            request = request.with_header(key, value);
        }

        Ok(request)
    }
}
