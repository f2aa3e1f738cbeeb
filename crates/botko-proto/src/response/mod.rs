//! IRC numeric reply codes as listed in RFC 2812 section 5.
//!
//! Numerics arrive in place of a command word and drive the registration
//! handshake. [`Response`] names every code the RFC defines; unknown codes are
//! still carried through [`crate::Command::Numeric`] untouched.
//!
//! # Reference
//! - RFC 2812 Section 5: Replies

#![allow(non_camel_case_types)]

mod helpers;

pub use helpers::ParseResponseError;

/// IRC server numeric reply.
///
/// Codes are grouped as:
/// - 001-099: Connection registration
/// - 200-399: Command replies
/// - 400-599: Error replies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    // === Connection Registration (001-099) ===
    /// 001
    RPL_WELCOME = 1,
    /// 002
    RPL_YOURHOST = 2,
    /// 003
    RPL_CREATED = 3,
    /// 004
    RPL_MYINFO = 4,
    /// 005
    RPL_BOUNCE = 5,

    // === Command Responses (200-399) ===
    /// 200
    RPL_TRACELINK = 200,
    /// 201
    RPL_TRACECONNECTING = 201,
    /// 202
    RPL_TRACEHANDSHAKE = 202,
    /// 203
    RPL_TRACEUNKNOWN = 203,
    /// 204
    RPL_TRACEOPERATOR = 204,
    /// 205
    RPL_TRACEUSER = 205,
    /// 206
    RPL_TRACESERVER = 206,
    /// 207
    RPL_TRACESERVICE = 207,
    /// 208
    RPL_TRACENEWTYPE = 208,
    /// 209
    RPL_TRACECLASS = 209,
    /// 210
    RPL_TRACERECONNECT = 210,
    /// 211
    RPL_STATSLINKINFO = 211,
    /// 212
    RPL_STATSCOMMANDS = 212,
    /// 213
    RPL_STATSCLINE = 213,
    /// 214
    RPL_STATSNLINE = 214,
    /// 215
    RPL_STATSILINE = 215,
    /// 216
    RPL_STATSKLINE = 216,
    /// 217
    RPL_STATSQLINE = 217,
    /// 218
    RPL_STATSYLINE = 218,
    /// 219
    RPL_ENDOFSTATS = 219,
    /// 221
    RPL_UMODEIS = 221,
    /// 231
    RPL_SERVICEINFO = 231,
    /// 232
    RPL_ENDOFSERVICES = 232,
    /// 233
    RPL_SERVICE = 233,
    /// 234
    RPL_SERVLIST = 234,
    /// 235
    RPL_SERVLISTEND = 235,
    /// 240
    RPL_STATSVLINE = 240,
    /// 241
    RPL_STATSLLINE = 241,
    /// 242
    RPL_STATSUPTIME = 242,
    /// 243
    RPL_STATSOLINE = 243,
    /// 244
    RPL_STATSHLINE = 244,
    /// 246
    RPL_STATSPING = 246,
    /// 247
    RPL_STATSBLINE = 247,
    /// 250
    RPL_STATSDLINE = 250,
    /// 251
    RPL_LUSERCLIENT = 251,
    /// 252
    RPL_LUSEROP = 252,
    /// 253
    RPL_LUSERUNKNOWN = 253,
    /// 254
    RPL_LUSERCHANNELS = 254,
    /// 255
    RPL_LUSERME = 255,
    /// 256
    RPL_ADMINME = 256,
    /// 257
    RPL_ADMINLOC1 = 257,
    /// 258
    RPL_ADMINLOC2 = 258,
    /// 259
    RPL_ADMINEMAIL = 259,
    /// 261
    RPL_TRACELOG = 261,
    /// 262
    RPL_TRACEEND = 262,
    /// 263
    RPL_TRYAGAIN = 263,
    /// 300
    RPL_NONE = 300,
    /// 301
    RPL_AWAY = 301,
    /// 302
    RPL_USERHOST = 302,
    /// 303
    RPL_ISON = 303,
    /// 305
    RPL_UNAWAY = 305,
    /// 306
    RPL_NOWAWAY = 306,
    /// 311
    RPL_WHOISUSER = 311,
    /// 312
    RPL_WHOISSERVER = 312,
    /// 313
    RPL_WHOISOPERATOR = 313,
    /// 314
    RPL_WHOWASUSER = 314,
    /// 315
    RPL_ENDOFWHO = 315,
    /// 316
    RPL_WHOISCHANOP = 316,
    /// 317
    RPL_WHOISIDLE = 317,
    /// 318
    RPL_ENDOFWHOIS = 318,
    /// 319
    RPL_WHOISCHANNELS = 319,
    /// 321
    RPL_LISTSTART = 321,
    /// 322
    RPL_LIST = 322,
    /// 323
    RPL_LISTEND = 323,
    /// 324
    RPL_CHANNELMODEIS = 324,
    /// 325
    RPL_UNIQOPIS = 325,
    /// 331
    RPL_NOTOPIC = 331,
    /// 332
    RPL_TOPIC = 332,
    /// 341
    RPL_INVITING = 341,
    /// 342
    RPL_SUMMONING = 342,
    /// 346
    RPL_INVITELIST = 346,
    /// 347
    RPL_ENDOFINVITELIST = 347,
    /// 348
    RPL_EXCEPTLIST = 348,
    /// 349
    RPL_ENDOFEXCEPTLIST = 349,
    /// 351
    RPL_VERSION = 351,
    /// 352
    RPL_WHOREPLY = 352,
    /// 353
    RPL_NAMREPLY = 353,
    /// 361
    RPL_KILLDONE = 361,
    /// 362
    RPL_CLOSING = 362,
    /// 363
    RPL_CLOSEEND = 363,
    /// 364
    RPL_LINKS = 364,
    /// 365
    RPL_ENDOFLINKS = 365,
    /// 366
    RPL_ENDOFNAMES = 366,
    /// 367
    RPL_BANLIST = 367,
    /// 368
    RPL_ENDOFBANLIST = 368,
    /// 369
    RPL_ENDOFWHOWAS = 369,
    /// 371
    RPL_INFO = 371,
    /// 372
    RPL_MOTD = 372,
    /// 374
    RPL_ENDOFINFO = 374,
    /// 375
    RPL_MOTDSTART = 375,
    /// 376
    RPL_ENDOFMOTD = 376,
    /// 381
    RPL_YOUREOPER = 381,
    /// 382
    RPL_REHASHING = 382,
    /// 383
    RPL_YOURESERVICE = 383,
    /// 384
    RPL_MYPORTIS = 384,
    /// 391
    RPL_TIME = 391,
    /// 392
    RPL_USERSSTART = 392,
    /// 393
    RPL_USERS = 393,
    /// 394
    RPL_ENDOFUSERS = 394,
    /// 395
    RPL_NOUSERS = 395,

    // === Error Replies (400-599) ===
    /// 401
    ERR_NOSUCHNICK = 401,
    /// 402
    ERR_NOSUCHSERVER = 402,
    /// 403
    ERR_NOSUCHCHANNEL = 403,
    /// 404
    ERR_CANNOTSENDTOCHAN = 404,
    /// 405
    ERR_TOOMANYCHANNELS = 405,
    /// 406
    ERR_WASNOSUCHNICK = 406,
    /// 407
    ERR_TOOMANYTARGETS = 407,
    /// 408
    ERR_NOSUCHSERVICE = 408,
    /// 409
    ERR_NOORIGIN = 409,
    /// 411
    ERR_NORECIPIENT = 411,
    /// 412
    ERR_NOTEXTTOSEND = 412,
    /// 413
    ERR_NOTOPLEVEL = 413,
    /// 414
    ERR_WILDTOPLEVEL = 414,
    /// 415
    ERR_BADMASK = 415,
    /// 421
    ERR_UNKNOWNCOMMAND = 421,
    /// 422
    ERR_NOMOTD = 422,
    /// 423
    ERR_NOADMININFO = 423,
    /// 424
    ERR_FILEERROR = 424,
    /// 431
    ERR_NONICKNAMEGIVEN = 431,
    /// 432
    ERR_ERRONEUSNICKNAME = 432,
    /// 433
    ERR_NICKNAMEINUSE = 433,
    /// 436
    ERR_NICKCOLLISION = 436,
    /// 437
    ERR_UNAVAILRESOURCE = 437,
    /// 441
    ERR_USERNOTINCHANNEL = 441,
    /// 442
    ERR_NOTONCHANNEL = 442,
    /// 443
    ERR_USERONCHANNEL = 443,
    /// 444
    ERR_NOLOGIN = 444,
    /// 445
    ERR_SUMMONDISABLED = 445,
    /// 446
    ERR_USERSDISABLED = 446,
    /// 451
    ERR_NOTREGISTERED = 451,
    /// 461
    ERR_NEEDMOREPARAMS = 461,
    /// 462
    ERR_ALREADYREGISTRED = 462,
    /// 463
    ERR_NOPERMFORHOST = 463,
    /// 464
    ERR_PASSWDMISMATCH = 464,
    /// 465
    ERR_YOUREBANNEDCREEP = 465,
    /// 466
    ERR_YOUWILLBEBANNED = 466,
    /// 467
    ERR_KEYSET = 467,
    /// 471
    ERR_CHANNELISFULL = 471,
    /// 472
    ERR_UNKNOWNMODE = 472,
    /// 473
    ERR_INVITEONLYCHAN = 473,
    /// 474
    ERR_BANNEDFROMCHAN = 474,
    /// 475
    ERR_BADCHANNELKEY = 475,
    /// 476
    ERR_BADCHANMASK = 476,
    /// 477
    ERR_NOCHANMODES = 477,
    /// 478
    ERR_BANLISTFULL = 478,
    /// 481
    ERR_NOPRIVILEGES = 481,
    /// 482
    ERR_CHANOPRIVSNEEDED = 482,
    /// 483
    ERR_CANTKILLSERVER = 483,
    /// 484
    ERR_RESTRICTED = 484,
    /// 485
    ERR_UNIQOPPRIVSNEEDED = 485,
    /// 491
    ERR_NOOPERHOST = 491,
    /// 492
    ERR_NOSERVICEHOST = 492,
    /// 501
    ERR_UMODEUNKNOWNFLAG = 501,
    /// 502
    ERR_USERSDONTMATCH = 502,
}

impl Response {
    /// RPL_STATSSLINE shares its code with [`Response::RPL_STATSHLINE`].
    pub const RPL_STATSSLINE: Response = Response::RPL_STATSHLINE;
    /// RPL_INFOSTART shares its code with [`Response::RPL_INFO`].
    pub const RPL_INFOSTART: Response = Response::RPL_INFO;

    pub(crate) const ALL: &'static [Response] = &[
        Response::RPL_WELCOME,
        Response::RPL_YOURHOST,
        Response::RPL_CREATED,
        Response::RPL_MYINFO,
        Response::RPL_BOUNCE,
        Response::RPL_TRACELINK,
        Response::RPL_TRACECONNECTING,
        Response::RPL_TRACEHANDSHAKE,
        Response::RPL_TRACEUNKNOWN,
        Response::RPL_TRACEOPERATOR,
        Response::RPL_TRACEUSER,
        Response::RPL_TRACESERVER,
        Response::RPL_TRACESERVICE,
        Response::RPL_TRACENEWTYPE,
        Response::RPL_TRACECLASS,
        Response::RPL_TRACERECONNECT,
        Response::RPL_STATSLINKINFO,
        Response::RPL_STATSCOMMANDS,
        Response::RPL_STATSCLINE,
        Response::RPL_STATSNLINE,
        Response::RPL_STATSILINE,
        Response::RPL_STATSKLINE,
        Response::RPL_STATSQLINE,
        Response::RPL_STATSYLINE,
        Response::RPL_ENDOFSTATS,
        Response::RPL_UMODEIS,
        Response::RPL_SERVICEINFO,
        Response::RPL_ENDOFSERVICES,
        Response::RPL_SERVICE,
        Response::RPL_SERVLIST,
        Response::RPL_SERVLISTEND,
        Response::RPL_STATSVLINE,
        Response::RPL_STATSLLINE,
        Response::RPL_STATSUPTIME,
        Response::RPL_STATSOLINE,
        Response::RPL_STATSHLINE,
        Response::RPL_STATSPING,
        Response::RPL_STATSBLINE,
        Response::RPL_STATSDLINE,
        Response::RPL_LUSERCLIENT,
        Response::RPL_LUSEROP,
        Response::RPL_LUSERUNKNOWN,
        Response::RPL_LUSERCHANNELS,
        Response::RPL_LUSERME,
        Response::RPL_ADMINME,
        Response::RPL_ADMINLOC1,
        Response::RPL_ADMINLOC2,
        Response::RPL_ADMINEMAIL,
        Response::RPL_TRACELOG,
        Response::RPL_TRACEEND,
        Response::RPL_TRYAGAIN,
        Response::RPL_NONE,
        Response::RPL_AWAY,
        Response::RPL_USERHOST,
        Response::RPL_ISON,
        Response::RPL_UNAWAY,
        Response::RPL_NOWAWAY,
        Response::RPL_WHOISUSER,
        Response::RPL_WHOISSERVER,
        Response::RPL_WHOISOPERATOR,
        Response::RPL_WHOWASUSER,
        Response::RPL_ENDOFWHO,
        Response::RPL_WHOISCHANOP,
        Response::RPL_WHOISIDLE,
        Response::RPL_ENDOFWHOIS,
        Response::RPL_WHOISCHANNELS,
        Response::RPL_LISTSTART,
        Response::RPL_LIST,
        Response::RPL_LISTEND,
        Response::RPL_CHANNELMODEIS,
        Response::RPL_UNIQOPIS,
        Response::RPL_NOTOPIC,
        Response::RPL_TOPIC,
        Response::RPL_INVITING,
        Response::RPL_SUMMONING,
        Response::RPL_INVITELIST,
        Response::RPL_ENDOFINVITELIST,
        Response::RPL_EXCEPTLIST,
        Response::RPL_ENDOFEXCEPTLIST,
        Response::RPL_VERSION,
        Response::RPL_WHOREPLY,
        Response::RPL_NAMREPLY,
        Response::RPL_KILLDONE,
        Response::RPL_CLOSING,
        Response::RPL_CLOSEEND,
        Response::RPL_LINKS,
        Response::RPL_ENDOFLINKS,
        Response::RPL_ENDOFNAMES,
        Response::RPL_BANLIST,
        Response::RPL_ENDOFBANLIST,
        Response::RPL_ENDOFWHOWAS,
        Response::RPL_INFO,
        Response::RPL_MOTD,
        Response::RPL_ENDOFINFO,
        Response::RPL_MOTDSTART,
        Response::RPL_ENDOFMOTD,
        Response::RPL_YOUREOPER,
        Response::RPL_REHASHING,
        Response::RPL_YOURESERVICE,
        Response::RPL_MYPORTIS,
        Response::RPL_TIME,
        Response::RPL_USERSSTART,
        Response::RPL_USERS,
        Response::RPL_ENDOFUSERS,
        Response::RPL_NOUSERS,
        Response::ERR_NOSUCHNICK,
        Response::ERR_NOSUCHSERVER,
        Response::ERR_NOSUCHCHANNEL,
        Response::ERR_CANNOTSENDTOCHAN,
        Response::ERR_TOOMANYCHANNELS,
        Response::ERR_WASNOSUCHNICK,
        Response::ERR_TOOMANYTARGETS,
        Response::ERR_NOSUCHSERVICE,
        Response::ERR_NOORIGIN,
        Response::ERR_NORECIPIENT,
        Response::ERR_NOTEXTTOSEND,
        Response::ERR_NOTOPLEVEL,
        Response::ERR_WILDTOPLEVEL,
        Response::ERR_BADMASK,
        Response::ERR_UNKNOWNCOMMAND,
        Response::ERR_NOMOTD,
        Response::ERR_NOADMININFO,
        Response::ERR_FILEERROR,
        Response::ERR_NONICKNAMEGIVEN,
        Response::ERR_ERRONEUSNICKNAME,
        Response::ERR_NICKNAMEINUSE,
        Response::ERR_NICKCOLLISION,
        Response::ERR_UNAVAILRESOURCE,
        Response::ERR_USERNOTINCHANNEL,
        Response::ERR_NOTONCHANNEL,
        Response::ERR_USERONCHANNEL,
        Response::ERR_NOLOGIN,
        Response::ERR_SUMMONDISABLED,
        Response::ERR_USERSDISABLED,
        Response::ERR_NOTREGISTERED,
        Response::ERR_NEEDMOREPARAMS,
        Response::ERR_ALREADYREGISTRED,
        Response::ERR_NOPERMFORHOST,
        Response::ERR_PASSWDMISMATCH,
        Response::ERR_YOUREBANNEDCREEP,
        Response::ERR_YOUWILLBEBANNED,
        Response::ERR_KEYSET,
        Response::ERR_CHANNELISFULL,
        Response::ERR_UNKNOWNMODE,
        Response::ERR_INVITEONLYCHAN,
        Response::ERR_BANNEDFROMCHAN,
        Response::ERR_BADCHANNELKEY,
        Response::ERR_BADCHANMASK,
        Response::ERR_NOCHANMODES,
        Response::ERR_BANLISTFULL,
        Response::ERR_NOPRIVILEGES,
        Response::ERR_CHANOPRIVSNEEDED,
        Response::ERR_CANTKILLSERVER,
        Response::ERR_RESTRICTED,
        Response::ERR_UNIQOPPRIVSNEEDED,
        Response::ERR_NOOPERHOST,
        Response::ERR_NOSERVICEHOST,
        Response::ERR_UMODEUNKNOWNFLAG,
        Response::ERR_USERSDONTMATCH,
    ];
}

/// Replies that settle a `NICK` attempt during registration.
pub const NICK_REPLIES: &[Response] = &[
    Response::ERR_NONICKNAMEGIVEN,
    Response::ERR_ERRONEUSNICKNAME,
    Response::ERR_UNAVAILRESOURCE,
    Response::ERR_NICKCOLLISION,
    Response::ERR_NICKNAMEINUSE,
    Response::ERR_RESTRICTED,
    Response::RPL_WELCOME,
];

/// Replies that settle the `USER` registration command.
pub const USER_REPLIES: &[Response] = &[
    Response::ERR_NEEDMOREPARAMS,
    Response::ERR_ALREADYREGISTRED,
    Response::RPL_WELCOME,
];

/// Replies that settle a `JOIN` request.
///
/// Only [`Response::RPL_ENDOFNAMES`] means the join went through.
pub const JOIN_REPLIES: &[Response] = &[
    Response::ERR_NEEDMOREPARAMS,
    Response::ERR_BANNEDFROMCHAN,
    Response::ERR_INVITEONLYCHAN,
    Response::ERR_BADCHANNELKEY,
    Response::ERR_CHANNELISFULL,
    Response::ERR_BADCHANMASK,
    Response::ERR_NOSUCHCHANNEL,
    Response::ERR_TOOMANYCHANNELS,
    Response::ERR_TOOMANYTARGETS,
    Response::ERR_UNAVAILRESOURCE,
    Response::RPL_TOPIC,
    Response::RPL_ENDOFNAMES,
];

/// Numeric codes of a reply set, in declaration order.
pub fn codes(replies: &[Response]) -> Vec<u16> {
    replies.iter().map(Response::code).collect()
}
