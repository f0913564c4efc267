use anyhow::Result;
use reading_log_parser::utils::{console, logging};
use reading_log_parser::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init(false);
            fatal(&e)
        }
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let mut app = App::initialize(config);
    if let Err(e) = app.run().await {
        fatal(&e);
    }

    Ok(())
}

fn fatal(err: &dyn std::fmt::Display) -> ! {
    let _ = console::print_fatal(&mut std::io::stderr(), err);
    std::process::exit(1)
}
