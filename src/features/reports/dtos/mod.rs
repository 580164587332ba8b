mod report_dto;

pub use report_dto::{
    InboundMessageDto, ModerationSweepResponseDto, ReportListQuery, ReportResponseDto,
    SubmitReportDto, SubmitReportResponseDto, TrackReportQuery, UpdateReportDto,
};
