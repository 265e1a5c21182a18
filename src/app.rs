use crate::clients::DashboardClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::run_terminal_operator;
use crate::models::{labels, load_author_form};
use crate::orchestrator::{BatchReport, BatchRunner};
use crate::services::disambiguation_gate;
use crate::utils::logging::{append_log_file, init_log_file, log_startup, print_final_stats};
use crate::workflow::RecordFlow;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{stdin, stdout, BufReader};
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// 应用主结构
pub struct App {
    config: Config,
    runner: BatchRunner,
    operator: JoinHandle<AppResult<()>>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;

        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(config.base_url_trimmed(), config.max_authors);

        let client = Arc::new(DashboardClient::new(&config));
        let (gate, operator) = disambiguation_gate::channel();

        // 终端是唯一的操作员界面
        let operator = tokio::spawn(run_terminal_operator(
            operator,
            BufReader::new(stdin()),
            stdout(),
        ));

        let flow = RecordFlow::new(client, Arc::new(gate));
        let runner = BatchRunner::new(flow, config.max_authors);

        Ok(Self {
            config,
            runner,
            operator,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> AppResult<BatchReport> {
        let Self {
            config,
            mut runner,
            operator,
        } = self;

        let slots = load_author_form(Path::new(&config.authors_file)).await?;
        let report = runner.run(&slots).await;

        match &report {
            BatchReport::MissingInput => {
                warn!("⚠️ {} ({})", labels::MISSING_INPUT, config.authors_file);
            }
            BatchReport::Completed { .. } => {
                let table = runner.ledger().render(config.base_url_trimmed());
                println!("\n{}", table);
                append_log_file(&config.output_log_file, &table)?;
                print_final_stats(
                    report.success_count(),
                    report.failed_count(),
                    report.total(),
                    &config.output_log_file,
                );
            }
        }

        // 释放选择门后操作员任务自行结束
        drop(runner);
        match operator.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("终端操作员异常退出: {}", e),
            Err(e) => error!("终端操作员任务失败: {}", e),
        }

        Ok(report)
    }
}
