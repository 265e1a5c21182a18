use anyhow::{Context, Result};
use author_batch::utils::logging;
use author_batch::{App, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _report = App::initialize(config)
        .await
        .context("初始化失败")?
        .run()
        .await
        .context("处理失败")?;

    Ok(())
}
