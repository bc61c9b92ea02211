//! MediaConvert client implementation.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_mediaconvert::types::{
    ContainerSettings, ContainerType, FileGroupSettings, H264RateControlMode, H264Settings, Input,
    JobSettings, Output, OutputGroup, OutputGroupSettings, OutputGroupType, VideoCodec,
    VideoCodecSettings, VideoDescription,
};
use aws_sdk_mediaconvert::Client;
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{TranscodeError, TranscodeResult};

const DEFAULT_REGION: &str = "ap-south-1";

/// Fixed output renditions: (width, height, bitrate, name modifier).
const RENDITIONS: &[(i32, i32, i32, &str)] = &[
    (1280, 720, 3_000_000, "_720p"),
    (854, 480, 1_000_000, "_480p"),
];

/// Configuration for the MediaConvert client.
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// AWS region
    pub region: String,
    /// IAM role MediaConvert assumes to read/write S3
    pub role_arn: String,
}

impl TranscodeConfig {
    /// Create config from environment variables.
    pub fn from_env() -> TranscodeResult<Self> {
        Ok(Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            role_arn: std::env::var("MEDIACONVERT_ROLE_ARN")
                .map_err(|_| TranscodeError::config_error("MEDIACONVERT_ROLE_ARN not set"))?,
        })
    }
}

/// MediaConvert client.
///
/// MediaConvert requires calls to go through an account- and region-specific
/// endpoint. The endpoint is discovered on first use and cached for the
/// process lifetime.
#[derive(Debug)]
pub struct TranscodeClient {
    sdk_config: aws_config::SdkConfig,
    role_arn: String,
    client: OnceCell<Client>,
}

impl TranscodeClient {
    /// Create a new client from configuration. No network call is made until
    /// the first submission.
    pub async fn new(config: TranscodeConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .load()
            .await;

        Self {
            sdk_config,
            role_arn: config.role_arn,
            client: OnceCell::new(),
        }
    }

    /// Create from environment variables.
    pub async fn from_env() -> TranscodeResult<Self> {
        Ok(Self::new(TranscodeConfig::from_env()?).await)
    }

    /// Resolve the endpoint-bound client, discovering the endpoint once.
    async fn client(&self) -> TranscodeResult<&Client> {
        self.client
            .get_or_try_init(|| async {
                let bootstrap = Client::new(&self.sdk_config);

                let endpoints = bootstrap
                    .describe_endpoints()
                    .send()
                    .await
                    .map_err(|e| TranscodeError::endpoint_discovery(e.to_string()))?;

                let url = endpoints
                    .endpoints()
                    .first()
                    .and_then(|e| e.url())
                    .ok_or_else(|| {
                        TranscodeError::endpoint_discovery("no endpoints in DescribeEndpoints response")
                    })?
                    .to_string();

                info!("MediaConvert endpoint: {}", url);

                let conf = aws_sdk_mediaconvert::config::Builder::from(&self.sdk_config)
                    .endpoint_url(url)
                    .build();
                Ok(Client::from_conf(conf))
            })
            .await
    }

    /// Submit a transcode job for a source video.
    ///
    /// The job produces the two fixed renditions into the destination
    /// prefix. Submission is fire-and-forget: the returned job id is the
    /// only confirmation, and the job outlives this process.
    pub async fn submit_job(
        &self,
        input_s3_url: &str,
        output_s3_prefix: &str,
    ) -> TranscodeResult<String> {
        let client = self.client().await?;
        let settings = build_job_settings(input_s3_url, output_s3_prefix);

        let response = client
            .create_job()
            .role(&self.role_arn)
            .settings(settings)
            .send()
            .await
            .map_err(|e| TranscodeError::submit_failed(e.to_string()))?;

        let job_id = response
            .job()
            .and_then(|job| job.id())
            .ok_or_else(|| TranscodeError::submit_failed("no job id in CreateJob response"))?
            .to_string();

        info!("Submitted transcode job {}", job_id);
        Ok(job_id)
    }
}

/// Build the job description: one file-group output at the destination
/// prefix with the two fixed H.264 CBR MP4 renditions.
fn build_job_settings(input_s3_url: &str, output_s3_prefix: &str) -> JobSettings {
    let mut group = OutputGroup::builder()
        .name("File Group")
        .output_group_settings(
            OutputGroupSettings::builder()
                .r#type(OutputGroupType::FileGroupSettings)
                .file_group_settings(
                    FileGroupSettings::builder()
                        .destination(output_s3_prefix)
                        .build(),
                )
                .build(),
        );

    for (width, height, bitrate, name_modifier) in RENDITIONS {
        group = group.outputs(rendition(*width, *height, *bitrate, name_modifier));
    }

    JobSettings::builder()
        .inputs(Input::builder().file_input(input_s3_url).build())
        .output_groups(group.build())
        .build()
}

fn rendition(width: i32, height: i32, bitrate: i32, name_modifier: &str) -> Output {
    Output::builder()
        // Distinct modifiers keep the renditions from colliding at the
        // shared destination prefix.
        .name_modifier(name_modifier)
        .container_settings(
            ContainerSettings::builder()
                .container(ContainerType::Mp4)
                .build(),
        )
        .video_description(
            VideoDescription::builder()
                .width(width)
                .height(height)
                .codec_settings(
                    VideoCodecSettings::builder()
                        .codec(VideoCodec::H264)
                        .h264_settings(
                            H264Settings::builder()
                                .rate_control_mode(H264RateControlMode::Cbr)
                                .bitrate(bitrate)
                                .build(),
                        )
                        .build(),
                )
                .build(),
        )
        .build()
}
